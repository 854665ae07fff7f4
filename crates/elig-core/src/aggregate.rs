//! Multi-visit aggregation.
//!
//! Per-visit estimates are combined into a case-level value per state by
//! a normalized weighted average. Weights always sum to 1 before the
//! average is taken; a non-positive raw weight sum (all-cancelled visits
//! with zeroed status weights, extreme time-weight underflow) falls back
//! to equal weights rather than dividing by zero.

use elig_common::VisitStatus;
use elig_config::{AggregationConfig, AggregationMode};
use elig_math::normalize_weights;

/// The per-visit facts that drive weighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisitWeightInput {
    pub elapsed_days: f64,
    pub status: VisitStatus,
}

/// Normalized aggregation weights for a list of visits.
pub fn visit_weights(visits: &[VisitWeightInput], config: &AggregationConfig) -> Vec<f64> {
    let raw: Vec<f64> = match config.mode {
        AggregationMode::Equal => vec![1.0; visits.len()],
        AggregationMode::TimeWeighted => visits
            .iter()
            .map(|v| (-v.elapsed_days.abs() / config.time_decay_days).exp())
            .collect(),
        AggregationMode::StatusWeighted => visits
            .iter()
            .map(|v| match v.status {
                VisitStatus::Scheduled => config.status_weights.scheduled,
                VisitStatus::Completed => config.status_weights.completed,
                VisitStatus::Cancelled => config.status_weights.cancelled,
            })
            .collect(),
    };

    normalize_weights(&raw)
}

/// Weighted average of per-visit values under pre-normalized weights.
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> f64 {
    debug_assert_eq!(values.len(), weights.len());
    values
        .iter()
        .zip(weights.iter())
        .map(|(v, w)| v * w)
        .sum()
}
