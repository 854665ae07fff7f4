//! Observation store seam.
//!
//! The production store lives outside this repository; the engine sees it
//! only through [`ObservationStore`]. Reads are the engine's sole I/O, and
//! each query is issued at most once per estimation call. Retry and
//! connection pooling belong to the store client behind this trait.

use elig_common::{DimensionSet, EligibilityState, StoreError};
use std::collections::HashMap;

/// A historical aggregate for one (state, dimension filter) pair.
///
/// `sample_size` counts all matching observations across states (the
/// denominator); `rate` is the fraction that ended in the queried state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub sample_size: u64,
    pub rate: f64,
}

impl Observation {
    /// The "no matching rows" answer. Sparse data is not an error; it is
    /// what the waterfall backoff exists to handle.
    pub const EMPTY: Observation = Observation {
        sample_size: 0,
        rate: 0.0,
    };
}

/// Read-only access to historical eligibility outcomes.
///
/// Implementations must be `Send + Sync`; the engine is stateless and
/// callers may run estimations in parallel against one shared store.
pub trait ObservationStore: Send + Sync {
    /// Fraction of past cases matching `filter` that ended in `state`,
    /// with the matching sample size.
    ///
    /// Zero matching rows is a successful [`Observation::EMPTY`] answer,
    /// not an error. Errors mean the store itself failed and are
    /// propagated, never converted into a rate.
    fn query(
        &self,
        state: EligibilityState,
        filter: &DimensionSet,
    ) -> Result<Observation, StoreError>;

    /// Fraction of eligible past-tense observations with a denial outcome
    /// within `window_days` of `elapsed_days`.
    ///
    /// `None` when the store has no denial-outcome data; the engine then
    /// treats the denial probability as zero.
    fn denial_rate(&self, elapsed_days: f64, window_days: f64) -> Result<Option<f64>, StoreError>;
}

/// Deterministic in-memory store for tests, benches, and demos.
///
/// Rows are keyed by `(state, canonical dimension key)`; absent keys
/// answer [`Observation::EMPTY`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: HashMap<(EligibilityState, String), Observation>,
    denial_outcomes: Vec<DenialOutcome>,
}

#[derive(Debug, Clone, Copy)]
struct DenialOutcome {
    elapsed_days: f64,
    denied: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an aggregate row for a (state, filter) pair.
    pub fn insert(
        &mut self,
        state: EligibilityState,
        filter: &DimensionSet,
        sample_size: u64,
        rate: f64,
    ) {
        self.rows.insert(
            (state, filter.canonical_key()),
            Observation { sample_size, rate },
        );
    }

    /// Insert the same aggregate row for all four states.
    pub fn insert_all_states(&mut self, filter: &DimensionSet, sample_size: u64, rate: f64) {
        for state in EligibilityState::ALL {
            self.insert(state, filter, sample_size, rate);
        }
    }

    /// Record one eligible past-tense observation with its denial outcome.
    pub fn record_denial_outcome(&mut self, elapsed_days: f64, denied: bool) {
        self.denial_outcomes.push(DenialOutcome {
            elapsed_days,
            denied,
        });
    }
}

impl ObservationStore for MemoryStore {
    fn query(
        &self,
        state: EligibilityState,
        filter: &DimensionSet,
    ) -> Result<Observation, StoreError> {
        Ok(self
            .rows
            .get(&(state, filter.canonical_key()))
            .copied()
            .unwrap_or(Observation::EMPTY))
    }

    fn denial_rate(&self, elapsed_days: f64, window_days: f64) -> Result<Option<f64>, StoreError> {
        let in_window: Vec<&DenialOutcome> = self
            .denial_outcomes
            .iter()
            .filter(|o| (o.elapsed_days - elapsed_days).abs() <= window_days)
            .collect();

        if in_window.is_empty() {
            return Ok(None);
        }

        let denied = in_window.iter().filter(|o| o.denied).count();
        Ok(Some(denied as f64 / in_window.len() as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elig_common::Dimension;

    fn filter() -> DimensionSet {
        DimensionSet::from_pairs([(Dimension::ProductType, "ppo")]).unwrap()
    }

    #[test]
    fn test_absent_key_is_empty_not_error() {
        let store = MemoryStore::new();
        let obs = store
            .query(EligibilityState::Eligible, &filter())
            .unwrap();
        assert_eq!(obs, Observation::EMPTY);
    }

    #[test]
    fn test_insert_and_query() {
        let mut store = MemoryStore::new();
        store.insert(EligibilityState::Eligible, &filter(), 120, 0.7);

        let obs = store
            .query(EligibilityState::Eligible, &filter())
            .unwrap();
        assert_eq!(obs.sample_size, 120);
        assert!((obs.rate - 0.7).abs() < 1e-12);

        // Other states at the same filter stay empty.
        let other = store
            .query(EligibilityState::NoInfo, &filter())
            .unwrap();
        assert_eq!(other, Observation::EMPTY);
    }

    #[test]
    fn test_denial_rate_windowing() {
        let mut store = MemoryStore::new();
        store.record_denial_outcome(10.0, true);
        store.record_denial_outcome(20.0, false);
        store.record_denial_outcome(100.0, true); // outside window

        let rate = store.denial_rate(15.0, 30.0).unwrap();
        assert_eq!(rate, Some(0.5));
    }

    #[test]
    fn test_denial_rate_no_data_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.denial_rate(30.0, 30.0).unwrap(), None);

        let mut store = MemoryStore::new();
        store.record_denial_outcome(500.0, true);
        assert_eq!(store.denial_rate(30.0, 30.0).unwrap(), None);
    }

    #[test]
    fn test_store_is_object_safe() {
        let store = MemoryStore::new();
        let dyn_store: &dyn ObservationStore = &store;
        assert!(dyn_store
            .query(EligibilityState::Eligible, &DimensionSet::empty())
            .is_ok());
    }
}
