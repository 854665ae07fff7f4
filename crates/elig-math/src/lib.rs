//! Eligibility engine math utilities.
//!
//! Pure numerical kernels with `f64` in and `f64` out: Bayesian shrinkage,
//! decay/growth curves, Wald intervals, and clamped normalization. Inputs
//! are NaN-guarded; invalid parameters yield NaN rather than panicking.

pub mod curves;
pub mod interval;
pub mod normalize;
pub mod shrink;

pub use curves::{exp_decay, exp_growth, linear_decay_to_zero, linear_growth};
pub use interval::{distribution_uncertainty, wald_interval};
pub use normalize::{normalize_clamped, normalize_weights};
pub use shrink::{sample_confidence, shrink_rate};
