//! Eligibility probability estimation engine.
//!
//! Estimates, for a healthcare coverage case, the probability distribution
//! over four mutually exclusive eligibility states as a function of
//! historical outcome data, elapsed time relative to the service date, and
//! identified risk factors.
//!
//! The pipeline is a chain of pure stages:
//!
//! dimension key → historical rate lookup (waterfall) → base probability →
//! time adjustment → risk adjustment → per-visit aggregation →
//! normalization and uncertainty.
//!
//! The engine is stateless per call: each request receives a fully
//! materialized [`elig_common::Case`] and an [`elig_config::EngineConfig`]
//! and returns a fresh [`result::CaseEstimate`]. The only collaborator is
//! the read-only [`store::ObservationStore`].

pub mod aggregate;
pub mod estimate;
pub mod logging;
pub mod result;
pub mod risk;
pub mod store;
pub mod time;
pub mod waterfall;

pub use estimate::estimate_case;
pub use result::{CaseEstimate, ConfidenceInterval, Distribution, StateEstimate, VisitEstimate};
pub use store::{MemoryStore, Observation, ObservationStore};
pub use waterfall::{lookup_state_rate, waterfall_levels, RateLookup, WaterfallLevel};
