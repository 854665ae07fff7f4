//! Decay and growth curves over elapsed days.
//!
//! All curves take a non-negative elapsed time `t` in days and return a
//! non-negative multiplicative factor. The exponential and linear-growth
//! families are uncapped (they approach 0 or grow slowly); the horizon
//! decay is the one curve with a hard floor at zero.

/// Exponential decay: `exp(-rate * t)`.
///
/// Returns NaN for NaN inputs, a negative rate, or negative `t`.
pub fn exp_decay(rate: f64, t: f64) -> f64 {
    if rate.is_nan() || t.is_nan() || rate < 0.0 || t < 0.0 {
        return f64::NAN;
    }
    (-rate * t).exp()
}

/// Exponential growth: `exp(rate * t)`.
///
/// Returns NaN for NaN inputs, a negative rate, or negative `t`.
pub fn exp_growth(rate: f64, t: f64) -> f64 {
    if rate.is_nan() || t.is_nan() || rate < 0.0 || t < 0.0 {
        return f64::NAN;
    }
    (rate * t).exp()
}

/// Linear growth: `1 + slope * t`.
///
/// Returns NaN for NaN inputs, a negative slope, or negative `t`.
pub fn linear_growth(slope: f64, t: f64) -> f64 {
    if slope.is_nan() || t.is_nan() || slope < 0.0 || t < 0.0 {
        return f64::NAN;
    }
    1.0 + slope * t
}

/// Linear decay to a hard zero floor: `1 - t / horizon` for `t <= horizon`,
/// `0` for `t > horizon`.
///
/// Used for retrospective-denial severities: the factor hits exactly zero
/// at the horizon and stays there. Returns NaN for NaN inputs, a
/// non-positive horizon, or negative `t`.
pub fn linear_decay_to_zero(t: f64, horizon: f64) -> f64 {
    if t.is_nan() || horizon.is_nan() || horizon <= 0.0 || t < 0.0 {
        return f64::NAN;
    }
    if t > horizon {
        return 0.0;
    }
    1.0 - t / horizon
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn exp_decay_at_zero_is_one() {
        assert!(approx_eq(exp_decay(0.001, 0.0), 1.0, 1e-12));
    }

    #[test]
    fn exp_decay_known_value() {
        // exp(-0.001 * 30) = 0.970446...
        assert!(approx_eq(exp_decay(0.001, 30.0), 0.970_445_533_548_508, 1e-12));
    }

    #[test]
    fn exp_growth_known_value() {
        // exp(0.001 * 30) = 1.030455...
        assert!(approx_eq(exp_growth(0.001, 30.0), 1.030_454_533_953_517, 1e-12));
    }

    #[test]
    fn linear_growth_known_value() {
        assert!(approx_eq(linear_growth(0.0002, 100.0), 1.02, 1e-12));
        assert!(approx_eq(linear_growth(0.0, 1000.0), 1.0, 1e-12));
    }

    #[test]
    fn horizon_decay_ladder() {
        // The 60-day ladder at quarter points.
        assert!(approx_eq(linear_decay_to_zero(0.0, 60.0), 1.0, 1e-12));
        assert!(approx_eq(linear_decay_to_zero(15.0, 60.0), 0.75, 1e-12));
        assert!(approx_eq(linear_decay_to_zero(30.0, 60.0), 0.5, 1e-12));
        assert!(approx_eq(linear_decay_to_zero(45.0, 60.0), 0.25, 1e-12));
        assert!(approx_eq(linear_decay_to_zero(60.0, 60.0), 0.0, 1e-12));
    }

    #[test]
    fn horizon_decay_floors_at_zero() {
        assert!(approx_eq(linear_decay_to_zero(61.0, 60.0), 0.0, 1e-12));
        assert!(approx_eq(linear_decay_to_zero(10_000.0, 60.0), 0.0, 1e-12));
    }

    #[test]
    fn negative_time_is_nan() {
        assert!(exp_decay(0.001, -1.0).is_nan());
        assert!(exp_growth(0.001, -1.0).is_nan());
        assert!(linear_growth(0.001, -1.0).is_nan());
        assert!(linear_decay_to_zero(-1.0, 60.0).is_nan());
    }

    #[test]
    fn negative_rate_is_nan() {
        assert!(exp_decay(-0.001, 10.0).is_nan());
        assert!(linear_growth(-0.001, 10.0).is_nan());
        assert!(linear_decay_to_zero(10.0, 0.0).is_nan());
    }
}
