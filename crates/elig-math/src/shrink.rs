//! Bayesian shrinkage toward a prior rate, and sample-size confidence.
//!
//! Small samples get pulled strongly toward the prior (pseudo-count
//! smoothing); large samples let the empirical rate speak. The confidence
//! score is a trust heuristic bounded by sample size, not a statistical
//! confidence level.

/// Pseudo-count shrinkage of an empirical rate toward a prior.
///
/// `adjusted = (n * rate + prior_weight * prior_rate) / (n + prior_weight)`
///
/// With `n = 0` this returns exactly `prior_rate`. The result always lies
/// between `rate` and `prior_rate`. Returns NaN for NaN inputs, negative
/// weights, or a zero denominator.
pub fn shrink_rate(sample_size: u64, rate: f64, prior_weight: f64, prior_rate: f64) -> f64 {
    if rate.is_nan() || prior_weight.is_nan() || prior_rate.is_nan() {
        return f64::NAN;
    }
    if prior_weight < 0.0 {
        return f64::NAN;
    }
    let n = sample_size as f64;
    let denom = n + prior_weight;
    if denom <= 0.0 {
        return f64::NAN;
    }
    (n * rate + prior_weight * prior_rate) / denom
}

/// Sample-size confidence: `min(cap, n / divisor)`.
///
/// Returns NaN for NaN inputs or a non-positive divisor.
pub fn sample_confidence(sample_size: u64, cap: f64, divisor: f64) -> f64 {
    if cap.is_nan() || divisor.is_nan() || divisor <= 0.0 {
        return f64::NAN;
    }
    (sample_size as f64 / divisor).min(cap)
}
