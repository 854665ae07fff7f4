//! Case input contracts.
//!
//! A `Case` is fully materialized by the caller before an estimate is
//! requested; the engine never persists or mutates it. These types match the
//! case input JSON schema consumed from the conversational front-end.

use crate::dimensions::DimensionSet;
use crate::id::{CaseId, VisitId};
use crate::states::{EligibilityState, Tense, VisitStatus};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a risk factor's severity responds to elapsed time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    /// Severity is applied as configured.
    #[default]
    Standard,
    /// Severity decays linearly to zero over the retrospective-denial
    /// horizon for past-tense cases.
    RetrospectiveDenial,
}

/// A named, severity-scored condition that discounts one state's probability.
///
/// Multiple risk factors may target the same state; their severities compose
/// additively before being subtracted from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RiskFactor {
    /// Caller-assigned identifier, e.g. `COVERAGE_LOSS`.
    pub id: String,

    /// The state this risk discounts.
    pub target_state: EligibilityState,

    /// Severity in [0, 1].
    pub severity: f64,

    #[serde(default)]
    pub kind: RiskKind,
}

impl RiskFactor {
    pub fn new(
        id: impl Into<String>,
        target_state: EligibilityState,
        severity: f64,
    ) -> Self {
        RiskFactor {
            id: id.into(),
            target_state,
            severity,
            kind: RiskKind::Standard,
        }
    }

    pub fn with_kind(mut self, kind: RiskKind) -> Self {
        self.kind = kind;
        self
    }
}

/// A single visit on a case.
///
/// A visit may carry its own dimension set (e.g. a different event tense or
/// product) and is estimated independently before aggregation. The status
/// feeds aggregation weighting only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Visit {
    pub id: VisitId,

    pub tense: Tense,

    /// Required for future/past tense; ignored for unknown.
    #[serde(default)]
    pub service_date: Option<NaiveDate>,

    #[serde(default)]
    pub dimensions: DimensionSet,

    pub status: VisitStatus,
}

/// A fully materialized estimation request.
///
/// The case-level tense and service date stand in for a single synthetic
/// visit when `visits` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Case {
    pub id: CaseId,

    #[serde(default)]
    pub dimensions: DimensionSet,

    pub tense: Tense,

    #[serde(default)]
    pub service_date: Option<NaiveDate>,

    #[serde(default)]
    pub visits: Vec<Visit>,

    #[serde(default)]
    pub risk_factors: Vec<RiskFactor>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensions::Dimension;

    #[test]
    fn test_risk_kind_defaults_to_standard() {
        let json = r#"{"id": "PAYER_ERROR", "target_state": "eligible", "severity": 0.05}"#;
        let risk: RiskFactor = serde_json::from_str(json).unwrap();
        assert_eq!(risk.kind, RiskKind::Standard);
    }

    #[test]
    fn test_risk_kind_retrospective_denial_parses() {
        let json = r#"{
            "id": "RETRO_DENIAL",
            "target_state": "eligible",
            "severity": 0.15,
            "kind": "retrospective_denial"
        }"#;
        let risk: RiskFactor = serde_json::from_str(json).unwrap();
        assert_eq!(risk.kind, RiskKind::RetrospectiveDenial);
    }

    #[test]
    fn test_case_minimal_parses_with_defaults() {
        let json = format!(
            r#"{{"id": "{}", "tense": "unknown"}}"#,
            CaseId::new()
        );
        let case: Case = serde_json::from_str(&json).unwrap();
        assert!(case.dimensions.is_empty());
        assert!(case.visits.is_empty());
        assert!(case.risk_factors.is_empty());
        assert!(case.service_date.is_none());
    }

    #[test]
    fn test_case_serde_roundtrip() {
        let case = Case {
            id: CaseId::new(),
            dimensions: DimensionSet::from_pairs([(Dimension::ProductType, "ppo")]).unwrap(),
            tense: Tense::Future,
            service_date: NaiveDate::from_ymd_opt(2026, 3, 15),
            visits: vec![Visit {
                id: VisitId::new(),
                tense: Tense::Future,
                service_date: NaiveDate::from_ymd_opt(2026, 3, 15),
                dimensions: DimensionSet::empty(),
                status: VisitStatus::Scheduled,
            }],
            risk_factors: vec![
                RiskFactor::new("COVERAGE_LOSS", EligibilityState::Eligible, 0.15)
            ],
        };
        let json = serde_json::to_string(&case).unwrap();
        let back: Case = serde_json::from_str(&json).unwrap();
        assert_eq!(case, back);
    }
}
