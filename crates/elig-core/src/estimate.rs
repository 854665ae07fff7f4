//! The estimation pipeline.
//!
//! `estimate_case` wires the stages together: configuration and input
//! validation (both before any store access), the case-level waterfall
//! per state, the per-visit adjustment pipeline, aggregation, and final
//! normalization with uncertainty reporting. Every stage is a pure
//! function of its inputs; nothing is cached across calls.

use chrono::NaiveDate;
use elig_common::{Case, DimensionSet, EligibilityState, Error, Tense, VisitId, VisitStatus};
use elig_config::{validate_engine_config, EngineConfig};
use elig_math::{distribution_uncertainty, normalize_clamped, wald_interval};
use tracing::warn;

use crate::aggregate::{visit_weights, weighted_mean, VisitWeightInput};
use crate::result::{CaseEstimate, ConfidenceInterval, Distribution, StateEstimate, VisitEstimate};
use crate::risk::{risk_factor, suppresses_state_curve};
use crate::store::ObservationStore;
use crate::time::{elapsed_days, time_factor};
use crate::waterfall::{lookup_state_rate, RateLookup};

/// z value for the 95% Wald interval.
const WALD_Z: f64 = 1.96;

/// One unit of estimation: a real visit, or the synthetic visit standing
/// in for a zero-visit case.
struct VisitUnit {
    visit_id: Option<VisitId>,
    tense: Tense,
    elapsed: f64,
    dimensions: DimensionSet,
    status: VisitStatus,
}

/// Estimate the eligibility distribution for a fully materialized case.
///
/// Validation failures (bad configuration, malformed case, elapsed time
/// contradicting the tense) are rejected before the store is touched.
/// Store failures propagate as [`Error::Store`]; only insufficient data
/// backs off inside the waterfall. The call is deterministic: identical
/// inputs against an unchanged store yield an equal estimate.
pub fn estimate_case(
    store: &dyn ObservationStore,
    case: &Case,
    config: &EngineConfig,
    as_of: NaiveDate,
) -> Result<CaseEstimate, Error> {
    validate_engine_config(config).map_err(|e| Error::Config(e.to_string()))?;
    let units = validate_case(case, as_of)?;

    // Case-level lookups, one per state; these anchor the reported base
    // probabilities and the interval sample sizes.
    let mut case_lookups: Vec<RateLookup> = Vec::with_capacity(EligibilityState::ALL.len());
    for state in EligibilityState::ALL {
        case_lookups.push(lookup_state_rate(
            store,
            state,
            &case.dimensions,
            &config.waterfall,
        )?);
    }

    // Per-visit pipeline.
    let weight_inputs: Vec<VisitWeightInput> = units
        .iter()
        .map(|u| VisitWeightInput {
            elapsed_days: u.elapsed,
            status: u.status,
        })
        .collect();
    let weights = visit_weights(&weight_inputs, &config.aggregation);

    let mut visit_estimates: Vec<VisitEstimate> = Vec::with_capacity(units.len());
    for (unit, weight) in units.iter().zip(weights.iter()) {
        visit_estimates.push(estimate_unit(store, case, config, unit, *weight)?);
    }

    // Aggregate per state across visits.
    let time_adjusted = aggregate_stage(&visit_estimates, &weights, |v, s| {
        (v.base.get(s) * v.time_factors.get(s)).max(0.0)
    });
    let risk_adjusted = aggregate_stage(&visit_estimates, &weights, |v, s| v.adjusted.get(s));

    let (normalized_arr, degenerate) = normalize_clamped(risk_adjusted.as_array());
    let normalized = Distribution::from_array(normalized_arr);
    if degenerate {
        warn!(
            case_id = %case.id,
            "all adjusted probabilities clamped to zero; falling back to uniform prior"
        );
    }

    let uncertainty = distribution_uncertainty(&normalized.as_array());

    let states: Vec<StateEstimate> = EligibilityState::ALL
        .iter()
        .zip(case_lookups.iter())
        .map(|(state, lookup)| {
            let p = normalized.get(*state);
            let (lower, upper) = wald_interval(p, lookup.sample_size, WALD_Z);
            StateEstimate {
                base_probability: lookup.probability,
                sample_size: lookup.sample_size,
                confidence: lookup.confidence,
                waterfall_level: lookup.level,
                time_adjusted: time_adjusted.get(*state),
                risk_adjusted: risk_adjusted.get(*state),
                normalized: p,
                interval: ConfidenceInterval { lower, upper },
            }
        })
        .collect();

    let mut iter = states.into_iter();
    Ok(CaseEstimate {
        eligible: iter.next().expect("four states"),
        not_eligible: iter.next().expect("four states"),
        no_info: iter.next().expect("four states"),
        unestablished: iter.next().expect("four states"),
        visits: visit_estimates,
        uncertainty,
        degenerate,
    })
}

/// Validate the case and materialize its visit units.
///
/// Runs entirely before any store access: dimension values, risk
/// severities, and elapsed times are all checked here.
fn validate_case(case: &Case, as_of: NaiveDate) -> Result<Vec<VisitUnit>, Error> {
    case.dimensions.validate()?;

    for risk in &case.risk_factors {
        if risk.id.trim().is_empty() {
            return Err(Error::InvalidInput(
                "risk factor id must not be blank".to_string(),
            ));
        }
        if !risk.severity.is_finite() || !(0.0..=1.0).contains(&risk.severity) {
            return Err(Error::InvalidInput(format!(
                "risk factor {} severity must be in [0, 1], got {}",
                risk.id, risk.severity
            )));
        }
    }

    if case.visits.is_empty() {
        // Zero visits: the case-level dimensions and tense act as a
        // single synthetic visit with full weight.
        let elapsed = elapsed_days(case.tense, case.service_date, as_of)?;
        return Ok(vec![VisitUnit {
            visit_id: None,
            tense: case.tense,
            elapsed,
            dimensions: case.dimensions.clone(),
            status: VisitStatus::Scheduled,
        }]);
    }

    let mut units = Vec::with_capacity(case.visits.len());
    for visit in &case.visits {
        visit.dimensions.validate()?;
        let elapsed = elapsed_days(visit.tense, visit.service_date, as_of)?;
        // A visit without dimensions of its own inherits the case-level set.
        let dimensions = if visit.dimensions.is_empty() {
            case.dimensions.clone()
        } else {
            visit.dimensions.clone()
        };
        units.push(VisitUnit {
            visit_id: Some(visit.id),
            tense: visit.tense,
            elapsed,
            dimensions,
            status: visit.status,
        });
    }
    Ok(units)
}

/// Run the lookup → time → risk pipeline for one visit unit.
fn estimate_unit(
    store: &dyn ObservationStore,
    case: &Case,
    config: &EngineConfig,
    unit: &VisitUnit,
    weight: f64,
) -> Result<VisitEstimate, Error> {
    let base = Distribution::try_from_fn(|state| {
        lookup_state_rate(store, state, &unit.dimensions, &config.waterfall)
            .map(|lookup| lookup.probability)
    })?;

    let time_factors = Distribution::try_from_fn(|state| {
        if suppresses_state_curve(state, unit.tense, &case.risk_factors, &config.risk) {
            return Ok(1.0);
        }
        time_factor(store, &config.time, state, unit.tense, unit.elapsed)
    })?;

    let risk_factors = Distribution::from_fn(|state| {
        risk_factor(
            state,
            &case.risk_factors,
            unit.tense,
            unit.elapsed,
            &config.risk,
        )
    });

    let adjusted = Distribution::from_fn(|state| {
        let time_adjusted = (base.get(state) * time_factors.get(state)).max(0.0);
        (time_adjusted * risk_factors.get(state)).max(0.0)
    });

    Ok(VisitEstimate {
        visit_id: unit.visit_id,
        tense: unit.tense,
        elapsed_days: unit.elapsed,
        weight,
        base,
        time_factors,
        risk_factors,
        adjusted,
    })
}

/// Weighted per-state average of a per-visit quantity.
fn aggregate_stage(
    visits: &[VisitEstimate],
    weights: &[f64],
    value: impl Fn(&VisitEstimate, EligibilityState) -> f64,
) -> Distribution {
    Distribution::from_fn(|state| {
        let values: Vec<f64> = visits.iter().map(|v| value(v, state)).collect();
        weighted_mean(&values, weights)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use elig_common::{CaseId, Dimension, RiskFactor};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn empty_case(tense: Tense) -> Case {
        Case {
            id: CaseId::new(),
            dimensions: DimensionSet::empty(),
            tense,
            service_date: None,
            visits: Vec::new(),
            risk_factors: Vec::new(),
        }
    }

    #[test]
    fn test_bad_config_fails_before_store_access() {
        struct PanicStore;
        impl ObservationStore for PanicStore {
            fn query(
                &self,
                _: EligibilityState,
                _: &DimensionSet,
            ) -> Result<crate::store::Observation, elig_common::StoreError> {
                panic!("store must not be queried");
            }
            fn denial_rate(
                &self,
                _: f64,
                _: f64,
            ) -> Result<Option<f64>, elig_common::StoreError> {
                panic!("store must not be queried");
            }
        }

        let mut config = EngineConfig::default();
        config.waterfall.min_sample_size = 0;
        let err = estimate_case(
            &PanicStore,
            &empty_case(Tense::Unknown),
            &config,
            date(2026, 3, 1),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_elapsed_time_fails_before_store_access() {
        struct PanicStore;
        impl ObservationStore for PanicStore {
            fn query(
                &self,
                _: EligibilityState,
                _: &DimensionSet,
            ) -> Result<crate::store::Observation, elig_common::StoreError> {
                panic!("store must not be queried");
            }
            fn denial_rate(
                &self,
                _: f64,
                _: f64,
            ) -> Result<Option<f64>, elig_common::StoreError> {
                panic!("store must not be queried");
            }
        }

        let mut case = empty_case(Tense::Future);
        case.service_date = Some(date(2026, 1, 1)); // behind as_of
        let err = estimate_case(
            &PanicStore,
            &case,
            &EngineConfig::default(),
            date(2026, 3, 1),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidElapsedTime { .. }));
    }

    #[test]
    fn test_out_of_range_severity_rejected() {
        let mut case = empty_case(Tense::Unknown);
        case.risk_factors
            .push(RiskFactor::new("BAD", EligibilityState::Eligible, 1.5));
        let err = estimate_case(
            &MemoryStore::new(),
            &case,
            &EngineConfig::default(),
            date(2026, 3, 1),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_empty_store_yields_uniform() {
        let estimate = estimate_case(
            &MemoryStore::new(),
            &empty_case(Tense::Unknown),
            &EngineConfig::default(),
            date(2026, 3, 1),
        )
        .unwrap();

        // Every state backs off to the prior rate, which normalizes to
        // uniform without being degenerate.
        assert!(!estimate.degenerate);
        for state in EligibilityState::ALL {
            assert!((estimate.state(state).normalized - 0.25).abs() < 1e-12);
        }
        assert!((estimate.normalized().sum() - 1.0).abs() < 1e-9);
        assert!((estimate.uncertainty - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_zero_visit_case_has_single_synthetic_visit() {
        let estimate = estimate_case(
            &MemoryStore::new(),
            &empty_case(Tense::Unknown),
            &EngineConfig::default(),
            date(2026, 3, 1),
        )
        .unwrap();

        assert_eq!(estimate.visits.len(), 1);
        let synthetic = &estimate.visits[0];
        assert_eq!(synthetic.visit_id, None);
        assert!((synthetic.weight - 1.0).abs() < 1e-12);
        assert_eq!(synthetic.elapsed_days, 0.0);
    }

    #[test]
    fn test_degenerate_case_flagged_and_uniform() {
        let mut store = MemoryStore::new();
        // All states well observed.
        store.insert_all_states(&DimensionSet::empty(), 1000, 0.25);

        let mut case = empty_case(Tense::Unknown);
        // Severity 1.0 on every state zeroes the whole distribution.
        for state in EligibilityState::ALL {
            case.risk_factors
                .push(RiskFactor::new(format!("Z_{state}"), state, 1.0));
        }

        let estimate =
            estimate_case(&store, &case, &EngineConfig::default(), date(2026, 3, 1)).unwrap();
        assert!(estimate.degenerate);
        for state in EligibilityState::ALL {
            let s = estimate.state(state);
            assert!((s.normalized - 0.25).abs() < 1e-12);
            assert!((s.risk_adjusted).abs() < 1e-12);
        }
    }

    #[test]
    fn test_wald_interval_uses_case_level_sample_size() {
        let mut store = MemoryStore::new();
        store.insert_all_states(&DimensionSet::empty(), 400, 0.25);

        let estimate = estimate_case(
            &store,
            &empty_case(Tense::Unknown),
            &EngineConfig::default(),
            date(2026, 3, 1),
        )
        .unwrap();

        let s = &estimate.eligible;
        assert_eq!(s.sample_size, 400);
        let half_width = WALD_Z * (s.normalized * (1.0 - s.normalized) / 400.0).sqrt();
        assert!((s.interval.lower - (s.normalized - half_width)).abs() < 1e-12);
        assert!((s.interval.upper - (s.normalized + half_width)).abs() < 1e-12);
    }

    #[test]
    fn test_interval_degenerates_without_samples() {
        let estimate = estimate_case(
            &MemoryStore::new(),
            &empty_case(Tense::Unknown),
            &EngineConfig::default(),
            date(2026, 3, 1),
        )
        .unwrap();
        assert_eq!(estimate.eligible.interval.lower, 0.0);
        assert_eq!(estimate.eligible.interval.upper, 1.0);
    }

    #[test]
    fn test_visit_inherits_case_dimensions_when_empty() {
        let dims = DimensionSet::from_pairs([(Dimension::ProductType, "ppo")]).unwrap();
        let mut store = MemoryStore::new();
        // Data exists only under the case-level filter.
        store.insert(EligibilityState::Eligible, &dims, 200, 0.9);

        let mut case = empty_case(Tense::Unknown);
        case.dimensions = dims;
        case.visits.push(elig_common::Visit {
            id: VisitId::new(),
            tense: Tense::Unknown,
            service_date: None,
            dimensions: DimensionSet::empty(),
            status: VisitStatus::Scheduled,
        });

        let estimate =
            estimate_case(&store, &case, &EngineConfig::default(), date(2026, 3, 1)).unwrap();
        // The visit found the case-level row: its eligible base reflects
        // the 0.9 rate, not the empty global average.
        assert!(estimate.visits[0].base.eligible > 0.8);
    }
}
