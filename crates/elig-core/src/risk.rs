//! Risk-severity adjustment and per-state risk discounting.
//!
//! Severities targeting a state compose additively before being
//! subtracted from 1; the resulting factor is clamped at zero so stacked
//! risks can zero a state out but never make it negative.
//!
//! Retrospective-denial severities decay linearly to zero over a
//! configured horizon for past-tense cases. This decorates the risk's own
//! severity before composition; it is distinct from the eligible/past
//! state curve in the time module, and the composition of the two is the
//! integrator's [`RetroDenialPolicy`] choice.

use elig_common::{EligibilityState, RiskFactor, RiskKind, Tense};
use elig_config::{RetroDenialPolicy, RiskConfig};
use elig_math::{exp_decay, exp_growth, linear_decay_to_zero};

/// Effective severity of one risk factor at the given tense and elapsed
/// time.
pub fn adjusted_severity(risk: &RiskFactor, tense: Tense, elapsed: f64, config: &RiskConfig) -> f64 {
    // Linear horizon decay is definitionally retrospective; a
    // retrospective-denial risk on a future or unknown-tense case falls
    // back to standard handling.
    if risk.kind == RiskKind::RetrospectiveDenial
        && tense == Tense::Past
        && config.retro_denial_policy != RetroDenialPolicy::StateCurveOnly
    {
        return risk.severity * linear_decay_to_zero(elapsed, config.retro_denial_horizon_days);
    }

    match (config.tense_scaling_rate, tense) {
        (Some(rate), Tense::Future) => risk.severity * exp_growth(rate, elapsed),
        (Some(rate), Tense::Past) => risk.severity * exp_decay(rate, elapsed),
        _ => risk.severity,
    }
}

/// Multiplicative risk discount for one state:
/// `max(0, 1 - Σ adjusted severities targeting the state)`.
pub fn risk_factor(
    state: EligibilityState,
    risks: &[RiskFactor],
    tense: Tense,
    elapsed: f64,
    config: &RiskConfig,
) -> f64 {
    let total: f64 = risks
        .iter()
        .filter(|r| r.target_state == state)
        .map(|r| adjusted_severity(r, tense, elapsed, config))
        .sum();

    (1.0 - total).max(0.0)
}

/// True when the eligible/past state curve should be suppressed for this
/// case: the severity-only policy is active and a retrospective-denial
/// risk targets the eligible state.
pub fn suppresses_state_curve(
    state: EligibilityState,
    tense: Tense,
    risks: &[RiskFactor],
    config: &RiskConfig,
) -> bool {
    config.retro_denial_policy == RetroDenialPolicy::SeverityOnly
        && state == EligibilityState::Eligible
        && tense == Tense::Past
        && risks.iter().any(|r| {
            r.kind == RiskKind::RetrospectiveDenial && r.target_state == EligibilityState::Eligible
        })
}
