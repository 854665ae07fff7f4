//! Engine configuration types.
//!
//! Every section and field is defaultable, so an empty JSON object
//! (`{}`) is a valid configuration carrying the documented defaults.
//! Defaults here are the parameter values the historical model was fit
//! against; overriding them is a per-call decision by the integrator.

use elig_common::{EligibilityState, Tense};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EngineConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub waterfall: WaterfallConfig,

    #[serde(default)]
    pub time: TimeConfig,

    #[serde(default)]
    pub risk: RiskConfig,

    #[serde(default)]
    pub aggregation: AggregationConfig,
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            schema_version: default_schema_version(),
            description: None,
            waterfall: WaterfallConfig::default(),
            time: TimeConfig::default(),
            risk: RiskConfig::default(),
            aggregation: AggregationConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, crate::validate::ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::validate::ValidationError::IoError(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_str(&content)
    }

    /// Parse configuration from a JSON string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self, crate::validate::ValidationError> {
        serde_json::from_str(json).map_err(|e| {
            crate::validate::ValidationError::ParseError(format!("Invalid JSON: {}", e))
        })
    }
}

/// Waterfall lookup thresholds and Bayesian smoothing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WaterfallConfig {
    /// Minimum observations for a specificity level to qualify.
    #[serde(default = "default_min_sample_size")]
    pub min_sample_size: u64,

    /// A level qualifies only when its confidence exceeds this.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// Pseudo-count weight of the prior in rate smoothing.
    #[serde(default = "default_prior_weight")]
    pub prior_weight: f64,

    /// Prior rate: uniform over the four states.
    #[serde(default = "default_prior_rate")]
    pub prior_rate: f64,

    /// Upper bound on sample-size confidence.
    #[serde(default = "default_confidence_cap")]
    pub confidence_cap: f64,

    /// Samples needed for full (pre-cap) confidence.
    #[serde(default = "default_confidence_divisor")]
    pub confidence_divisor: f64,
}

fn default_min_sample_size() -> u64 {
    20
}
fn default_min_confidence() -> f64 {
    0.2
}
fn default_prior_weight() -> f64 {
    10.0
}
fn default_prior_rate() -> f64 {
    0.25
}
fn default_confidence_cap() -> f64 {
    0.95
}
fn default_confidence_divisor() -> f64 {
    100.0
}

impl Default for WaterfallConfig {
    fn default() -> Self {
        WaterfallConfig {
            min_sample_size: default_min_sample_size(),
            min_confidence: default_min_confidence(),
            prior_weight: default_prior_weight(),
            prior_rate: default_prior_rate(),
            confidence_cap: default_confidence_cap(),
            confidence_divisor: default_confidence_divisor(),
        }
    }
}

/// Time adjustment configuration: the per-(state, tense) curve table plus
/// the denial-rate lookup window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimeConfig {
    #[serde(default)]
    pub curves: TimeCurveTable,

    /// Half-width (days) of the denial-rate window around the elapsed time.
    #[serde(default = "default_denial_window_days")]
    pub denial_window_days: f64,
}

fn default_denial_window_days() -> f64 {
    30.0
}

impl Default for TimeConfig {
    fn default() -> Self {
        TimeConfig {
            curves: TimeCurveTable::default(),
            denial_window_days: default_denial_window_days(),
        }
    }
}

/// A single time-adjustment curve.
///
/// The per-state, per-tense adjustment table is data, not branching code:
/// each cell holds one of these specs, and the evaluator is shared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurveSpec {
    /// Identity: factor is 1 regardless of elapsed time.
    Constant,
    /// `exp(-rate * t)`.
    ExpDecay { rate: f64 },
    /// `1 + slope * t`.
    LinearGrowth { slope: f64 },
    /// `exp(-rate * t) * (1 - denial_rate(t))`, with the denial rate read
    /// from the observation store.
    DenialScaledDecay { rate: f64 },
}

/// The future/past curve pair for one state. Unknown tense bypasses the
/// table entirely (identity factor).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TensePair {
    pub future: CurveSpec,
    pub past: CurveSpec,
}

/// Per-state time-adjustment curves.
///
/// Defaults:
///
/// | State         | Future                  | Past                          |
/// |---------------|-------------------------|-------------------------------|
/// | eligible      | exp decay, λ 0.001/day  | denial-scaled decay, λ 0.0005 |
/// | not_eligible  | constant                | linear growth, β 0.0002/day   |
/// | no_info       | linear growth, α 0.0001 | exp decay, λ 0.001/day        |
/// | unestablished | constant                | exp decay, λ 0.002/day        |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimeCurveTable {
    #[serde(default = "default_eligible_curves")]
    pub eligible: TensePair,

    #[serde(default = "default_not_eligible_curves")]
    pub not_eligible: TensePair,

    #[serde(default = "default_no_info_curves")]
    pub no_info: TensePair,

    #[serde(default = "default_unestablished_curves")]
    pub unestablished: TensePair,
}

fn default_eligible_curves() -> TensePair {
    TensePair {
        future: CurveSpec::ExpDecay { rate: 0.001 },
        past: CurveSpec::DenialScaledDecay { rate: 0.0005 },
    }
}

fn default_not_eligible_curves() -> TensePair {
    TensePair {
        future: CurveSpec::Constant,
        past: CurveSpec::LinearGrowth { slope: 0.0002 },
    }
}

fn default_no_info_curves() -> TensePair {
    TensePair {
        future: CurveSpec::LinearGrowth { slope: 0.0001 },
        past: CurveSpec::ExpDecay { rate: 0.001 },
    }
}

fn default_unestablished_curves() -> TensePair {
    TensePair {
        future: CurveSpec::Constant,
        past: CurveSpec::ExpDecay { rate: 0.002 },
    }
}

impl Default for TimeCurveTable {
    fn default() -> Self {
        TimeCurveTable {
            eligible: default_eligible_curves(),
            not_eligible: default_not_eligible_curves(),
            no_info: default_no_info_curves(),
            unestablished: default_unestablished_curves(),
        }
    }
}

impl TimeCurveTable {
    /// Look up the curve for a (state, tense) cell.
    ///
    /// Returns `None` for unknown tense, which has no curve: the
    /// adjustment is the identity.
    pub fn curve(&self, state: EligibilityState, tense: Tense) -> Option<CurveSpec> {
        let pair = match state {
            EligibilityState::Eligible => self.eligible,
            EligibilityState::NotEligible => self.not_eligible,
            EligibilityState::NoInfo => self.no_info,
            EligibilityState::Unestablished => self.unestablished,
        };
        match tense {
            Tense::Future => Some(pair.future),
            Tense::Past => Some(pair.past),
            Tense::Unknown => None,
        }
    }
}

/// How the two retrospective-denial decay mechanisms compose.
///
/// The linear severity decay (60-day floor) and the general eligible/past
/// state curve act at different levels; which of them applies is an
/// explicit integrator choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RetroDenialPolicy {
    /// Both apply: the severity decays linearly and the eligible/past
    /// state curve runs as configured.
    #[default]
    Compose,
    /// Only the severity decay applies; the eligible/past state curve is
    /// suppressed while a retrospective-denial risk targets eligible.
    SeverityOnly,
    /// Only the state curve applies; severities are used as-is.
    StateCurveOnly,
}

/// Risk adjustment configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RiskConfig {
    /// Days over which a retrospective-denial severity decays to zero.
    #[serde(default = "default_retro_denial_horizon_days")]
    pub retro_denial_horizon_days: f64,

    /// When set, standard severities scale with tense: amplified by
    /// `exp(rate * t)` for future, decayed by `exp(-rate * t)` for past.
    /// Off by default; severities are then used as given.
    #[serde(default)]
    pub tense_scaling_rate: Option<f64>,

    #[serde(default)]
    pub retro_denial_policy: RetroDenialPolicy,
}

fn default_retro_denial_horizon_days() -> f64 {
    60.0
}

impl Default for RiskConfig {
    fn default() -> Self {
        RiskConfig {
            retro_denial_horizon_days: default_retro_denial_horizon_days(),
            tense_scaling_rate: None,
            retro_denial_policy: RetroDenialPolicy::default(),
        }
    }
}

/// Multi-visit aggregation weighting policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    /// `w_i = 1 / n_visits`.
    #[default]
    Equal,
    /// `w_i = exp(-|t_i| / tau)`.
    TimeWeighted,
    /// Fixed weights by visit status.
    StatusWeighted,
}

/// Fixed per-status weights for status-weighted aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StatusWeights {
    #[serde(default = "default_scheduled_weight")]
    pub scheduled: f64,

    #[serde(default = "default_completed_weight")]
    pub completed: f64,

    #[serde(default = "default_cancelled_weight")]
    pub cancelled: f64,
}

fn default_scheduled_weight() -> f64 {
    1.0
}
fn default_completed_weight() -> f64 {
    0.8
}
fn default_cancelled_weight() -> f64 {
    0.5
}

impl Default for StatusWeights {
    fn default() -> Self {
        StatusWeights {
            scheduled: default_scheduled_weight(),
            completed: default_completed_weight(),
            cancelled: default_cancelled_weight(),
        }
    }
}

/// Visit aggregation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AggregationConfig {
    #[serde(default)]
    pub mode: AggregationMode,

    /// Tau (days) for time-weighted aggregation.
    #[serde(default = "default_time_decay_days")]
    pub time_decay_days: f64,

    #[serde(default)]
    pub status_weights: StatusWeights,
}

fn default_time_decay_days() -> f64 {
    30.0
}

impl Default for AggregationConfig {
    fn default() -> Self {
        AggregationConfig {
            mode: AggregationMode::default(),
            time_decay_days: default_time_decay_days(),
            status_weights: StatusWeights::default(),
        }
    }
}
