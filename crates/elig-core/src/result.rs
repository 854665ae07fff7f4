//! Estimation result types.
//!
//! Everything here serializes and compares by value so idempotence is
//! bit-testable: two calls with identical inputs produce equal
//! `CaseEstimate`s and identical JSON.

use elig_common::{EligibilityState, Tense, VisitId};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One `f64` per eligibility state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Distribution {
    pub eligible: f64,
    pub not_eligible: f64,
    pub no_info: f64,
    pub unestablished: f64,
}

impl Distribution {
    /// Uniform prior over the four states.
    pub const UNIFORM: Distribution = Distribution {
        eligible: 0.25,
        not_eligible: 0.25,
        no_info: 0.25,
        unestablished: 0.25,
    };

    pub fn get(&self, state: EligibilityState) -> f64 {
        match state {
            EligibilityState::Eligible => self.eligible,
            EligibilityState::NotEligible => self.not_eligible,
            EligibilityState::NoInfo => self.no_info,
            EligibilityState::Unestablished => self.unestablished,
        }
    }

    pub fn as_array(&self) -> [f64; 4] {
        [
            self.eligible,
            self.not_eligible,
            self.no_info,
            self.unestablished,
        ]
    }

    pub fn from_array(values: [f64; 4]) -> Self {
        Distribution {
            eligible: values[0],
            not_eligible: values[1],
            no_info: values[2],
            unestablished: values[3],
        }
    }

    /// Build a distribution by evaluating `f` per state.
    pub fn from_fn(mut f: impl FnMut(EligibilityState) -> f64) -> Self {
        Distribution {
            eligible: f(EligibilityState::Eligible),
            not_eligible: f(EligibilityState::NotEligible),
            no_info: f(EligibilityState::NoInfo),
            unestablished: f(EligibilityState::Unestablished),
        }
    }

    /// Build a distribution by evaluating `f` per state, propagating the
    /// first error.
    pub fn try_from_fn<E>(
        mut f: impl FnMut(EligibilityState) -> Result<f64, E>,
    ) -> Result<Self, E> {
        Ok(Distribution {
            eligible: f(EligibilityState::Eligible)?,
            not_eligible: f(EligibilityState::NotEligible)?,
            no_info: f(EligibilityState::NoInfo)?,
            unestablished: f(EligibilityState::Unestablished)?,
        })
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }
}

/// Wald confidence interval, clamped to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// The full evidence trail for one state's estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StateEstimate {
    /// Smoothed base probability from the case-level waterfall lookup.
    pub base_probability: f64,

    /// Sample size behind the base probability.
    pub sample_size: u64,

    /// Sample-size confidence of the base lookup.
    pub confidence: f64,

    /// Waterfall level the base lookup selected (6 = fully specific,
    /// 0 = global average).
    pub waterfall_level: usize,

    /// Aggregated probability after time adjustment, before risk.
    pub time_adjusted: f64,

    /// Aggregated probability after time and risk adjustment, before
    /// normalization.
    pub risk_adjusted: f64,

    /// Final normalized probability.
    pub normalized: f64,

    /// Wald interval around the normalized probability, using the
    /// case-level sample size.
    pub interval: ConfidenceInterval,
}

/// Per-visit evidence: what each visit contributed to the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VisitEstimate {
    /// `None` for the synthetic visit of a zero-visit case.
    pub visit_id: Option<VisitId>,

    pub tense: Tense,

    pub elapsed_days: f64,

    /// Normalized aggregation weight.
    pub weight: f64,

    /// Smoothed base probabilities from this visit's lookups.
    pub base: Distribution,

    /// Time-adjustment factors applied per state.
    pub time_factors: Distribution,

    /// Risk-adjustment factors applied per state.
    pub risk_factors: Distribution,

    /// Per-state adjusted probabilities (base × time × risk, clamped).
    pub adjusted: Distribution,
}

/// Case-level estimation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CaseEstimate {
    pub eligible: StateEstimate,
    pub not_eligible: StateEstimate,
    pub no_info: StateEstimate,
    pub unestablished: StateEstimate,

    /// Per-visit evidence trail, in input order.
    pub visits: Vec<VisitEstimate>,

    /// `1 - max(normalized probability)`.
    pub uncertainty: f64,

    /// True when all four adjusted probabilities clamped to zero and the
    /// result fell back to the uniform prior. Non-fatal; callers should
    /// surface low confidence to the user.
    pub degenerate: bool,
}

impl CaseEstimate {
    pub fn state(&self, state: EligibilityState) -> &StateEstimate {
        match state {
            EligibilityState::Eligible => &self.eligible,
            EligibilityState::NotEligible => &self.not_eligible,
            EligibilityState::NoInfo => &self.no_info,
            EligibilityState::Unestablished => &self.unestablished,
        }
    }

    /// The normalized distribution as one value.
    pub fn normalized(&self) -> Distribution {
        Distribution {
            eligible: self.eligible.normalized,
            not_eligible: self.not_eligible.normalized,
            no_info: self.no_info.normalized,
            unestablished: self.unestablished.normalized,
        }
    }
}
