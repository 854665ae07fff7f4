//! Eligibility engine common types, IDs, and errors.
//!
//! This crate provides foundational types shared across the engine crates:
//! - Eligibility state, tense, and visit status enums
//! - Dimension schema and immutable dimension sets
//! - Case, visit, and risk factor input contracts
//! - Common error types with stable codes

pub mod case;
pub mod dimensions;
pub mod error;
pub mod id;
pub mod states;

pub use case::{Case, RiskFactor, RiskKind, Visit};
pub use dimensions::{Dimension, DimensionSet};
pub use error::{Error, Result, StoreError};
pub use id::{CaseId, VisitId};
pub use states::{EligibilityState, Tense, VisitStatus};
