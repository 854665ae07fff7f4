//! Eligibility engine configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the engine configuration JSON
//! - Documented defaults for every parameter
//! - Schema and semantic validation

pub mod engine;
pub mod validate;

pub use engine::{
    AggregationConfig, AggregationMode, CurveSpec, EngineConfig, RetroDenialPolicy, RiskConfig,
    StatusWeights, TensePair, TimeConfig, TimeCurveTable, WaterfallConfig,
};
pub use validate::{validate_engine_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
