//! Core enums for the 4-state eligibility model.
//!
//! Every distribution the engine produces assigns a probability to all four
//! states; the enum is exhaustive and the states are mutually exclusive.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Coverage eligibility states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityState {
    /// Coverage is expected to apply.
    Eligible,
    /// Coverage is expected not to apply.
    NotEligible,
    /// No information is available either way.
    NoInfo,
    /// Coverage could not be established with the payer.
    Unestablished,
}

impl EligibilityState {
    /// All states, in the order used for distributions and reports.
    pub const ALL: [EligibilityState; 4] = [
        EligibilityState::Eligible,
        EligibilityState::NotEligible,
        EligibilityState::NoInfo,
        EligibilityState::Unestablished,
    ];

    /// Stable snake_case name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EligibilityState::Eligible => "eligible",
            EligibilityState::NotEligible => "not_eligible",
            EligibilityState::NoInfo => "no_info",
            EligibilityState::Unestablished => "unestablished",
        }
    }
}

impl std::fmt::Display for EligibilityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Temporal relation of a service date to the evaluation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Tense {
    /// Service date lies at or after the evaluation date.
    Future,
    /// Service date lies before the evaluation date.
    Past,
    /// Temporal relation unknown; time adjustment is the identity.
    Unknown,
}

impl Tense {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tense::Future => "future",
            Tense::Past => "past",
            Tense::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Tense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Visit status, used only for aggregation weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl VisitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitStatus::Scheduled => "scheduled",
            VisitStatus::Completed => "completed",
            VisitStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_all_is_exhaustive() {
        assert_eq!(EligibilityState::ALL.len(), 4);
        let mut seen = std::collections::HashSet::new();
        for state in EligibilityState::ALL {
            seen.insert(state);
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_state_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&EligibilityState::NotEligible).unwrap(),
            "\"not_eligible\""
        );
        let state: EligibilityState = serde_json::from_str("\"no_info\"").unwrap();
        assert_eq!(state, EligibilityState::NoInfo);
    }

    #[test]
    fn test_state_display_matches_serde() {
        for state in EligibilityState::ALL {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state));
        }
    }

    #[test]
    fn test_tense_display() {
        assert_eq!(Tense::Future.to_string(), "future");
        assert_eq!(Tense::Past.to_string(), "past");
        assert_eq!(Tense::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_visit_status_serde_roundtrip() {
        for status in [
            VisitStatus::Scheduled,
            VisitStatus::Completed,
            VisitStatus::Cancelled,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            let back: VisitStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(status, back);
        }
    }
}
