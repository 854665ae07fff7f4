//! Clamped normalization of state probabilities and aggregation weights.

/// Normalize four state probabilities to sum to 1, clamping negatives to
/// zero first.
///
/// Returns the normalized distribution and a degenerate flag. When every
/// clamped entry is zero (or any entry is NaN), the result falls back to
/// the uniform distribution and the flag is set so callers can surface
/// low confidence instead of dividing by zero.
pub fn normalize_clamped(values: [f64; 4]) -> ([f64; 4], bool) {
    if values.iter().any(|v| v.is_nan()) {
        return ([0.25; 4], true);
    }
    let clamped = values.map(|v| v.max(0.0));
    let sum: f64 = clamped.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return ([0.25; 4], true);
    }
    (clamped.map(|v| v / sum), false)
}

/// Normalize non-negative aggregation weights to sum to 1.
///
/// Falls back to equal weights when the raw sum is not positive (all-zero
/// weights, underflow) or any weight is NaN, so a weighted average is
/// always well defined. Returns an empty vector for empty input.
pub fn normalize_weights(weights: &[f64]) -> Vec<f64> {
    if weights.is_empty() {
        return Vec::new();
    }
    let equal = 1.0 / weights.len() as f64;
    if weights.iter().any(|w| w.is_nan() || *w < 0.0) {
        return vec![equal; weights.len()];
    }
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return vec![equal; weights.len()];
    }
    weights.iter().map(|w| w / sum).collect()
}
