//! Wald confidence intervals and distribution uncertainty.

/// Wald approximation interval for a proportion:
/// `p ± z * sqrt(p * (1 - p) / n)`, clamped to `[0, 1]`.
///
/// With `n = 0` the interval degenerates to `[0, 1]` (maximum width)
/// rather than dividing by zero. Returns `(NaN, NaN)` for NaN inputs,
/// `p` outside `[0, 1]`, or a non-positive `z`.
pub fn wald_interval(p: f64, n: u64, z: f64) -> (f64, f64) {
    if p.is_nan() || z.is_nan() || !(0.0..=1.0).contains(&p) || z <= 0.0 {
        return (f64::NAN, f64::NAN);
    }
    if n == 0 {
        return (0.0, 1.0);
    }
    let half_width = z * (p * (1.0 - p) / n as f64).sqrt();
    ((p - half_width).max(0.0), (p + half_width).min(1.0))
}

/// Uncertainty of a normalized distribution: `1 - max(p)`.
///
/// Zero when one state holds all the mass; approaches `1 - 1/k` as the
/// distribution flattens. Returns NaN if any entry is NaN.
pub fn distribution_uncertainty(probs: &[f64]) -> f64 {
    if probs.is_empty() || probs.iter().any(|p| p.is_nan()) {
        return f64::NAN;
    }
    let max = probs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    1.0 - max
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
    fn wald_known_value() {
        // p=0.5, n=100, z=1.96 -> half width 0.098
        let (lower, upper) = wald_interval(0.5, 100, 1.96);
        assert!(approx_eq(lower, 0.402, 1e-12));
        assert!(approx_eq(upper, 0.598, 1e-12));
    }

    #[test]
    fn wald_clamps_to_unit_interval() {
        let (lower, upper) = wald_interval(0.99, 10, 1.96);
        assert!(lower >= 0.0);
        assert!(approx_eq(upper, 1.0, 1e-12));

        let (lower2, _) = wald_interval(0.01, 10, 1.96);
        assert!(approx_eq(lower2, 0.0, 1e-12));
    }

    #[test]
    fn wald_zero_samples_is_maximum_width() {
        assert_eq!(wald_interval(0.7, 0, 1.96), (0.0, 1.0));
    }

    #[test]
    fn wald_degenerate_p_has_zero_width() {
        let (lower, upper) = wald_interval(1.0, 50, 1.96);
        assert!(approx_eq(lower, 1.0, 1e-12));
        assert!(approx_eq(upper, 1.0, 1e-12));
    }

    #[test]
    fn wald_invalid_inputs_are_nan() {
        assert!(wald_interval(1.5, 10, 1.96).0.is_nan());
        assert!(wald_interval(0.5, 10, 0.0).0.is_nan());
        assert!(wald_interval(f64::NAN, 10, 1.96).0.is_nan());
    }

    #[test]
    fn uncertainty_peaked_vs_uniform() {
        assert!(approx_eq(
            distribution_uncertainty(&[1.0, 0.0, 0.0, 0.0]),
            0.0,
            1e-12
        ));
        assert!(approx_eq(
            distribution_uncertainty(&[0.25, 0.25, 0.25, 0.25]),
            0.75,
            1e-12
        ));
    }

    #[test]
    fn uncertainty_nan_propagates() {
        assert!(distribution_uncertainty(&[0.5, f64::NAN]).is_nan());
        assert!(distribution_uncertainty(&[]).is_nan());
    }
}
