//! Configuration validation errors and semantic validation.
//!
//! Invalid parameters fail fast at call time and are never silently
//! defaulted; the engine refuses to run with a nonsensical model.

use thiserror::Error;

use crate::engine::{
    AggregationConfig, CurveSpec, EngineConfig, RiskConfig, TimeConfig, WaterfallConfig,
};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate engine configuration semantically.
pub fn validate_engine_config(config: &EngineConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    validate_waterfall(&config.waterfall)?;
    validate_time(&config.time)?;
    validate_risk(&config.risk)?;
    validate_aggregation(&config.aggregation)?;

    Ok(())
}

fn validate_waterfall(config: &WaterfallConfig) -> ValidationResult<()> {
    if config.min_sample_size == 0 {
        return Err(ValidationError::InvalidValue {
            field: "waterfall.min_sample_size".to_string(),
            message: "Must be positive".to_string(),
        });
    }

    if !config.min_confidence.is_finite()
        || config.min_confidence < 0.0
        || config.min_confidence >= 1.0
    {
        return Err(ValidationError::InvalidValue {
            field: "waterfall.min_confidence".to_string(),
            message: format!("Must be in [0, 1), got {}", config.min_confidence),
        });
    }

    if !config.prior_weight.is_finite() || config.prior_weight < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "waterfall.prior_weight".to_string(),
            message: format!("Must be non-negative, got {}", config.prior_weight),
        });
    }

    if !config.prior_rate.is_finite() || !(0.0..=1.0).contains(&config.prior_rate) {
        return Err(ValidationError::InvalidValue {
            field: "waterfall.prior_rate".to_string(),
            message: format!("Must be in [0, 1], got {}", config.prior_rate),
        });
    }

    if !config.confidence_cap.is_finite()
        || config.confidence_cap <= 0.0
        || config.confidence_cap > 1.0
    {
        return Err(ValidationError::InvalidValue {
            field: "waterfall.confidence_cap".to_string(),
            message: format!("Must be in (0, 1], got {}", config.confidence_cap),
        });
    }

    if !config.confidence_divisor.is_finite() || config.confidence_divisor <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "waterfall.confidence_divisor".to_string(),
            message: format!("Must be positive, got {}", config.confidence_divisor),
        });
    }

    Ok(())
}

fn validate_time(config: &TimeConfig) -> ValidationResult<()> {
    if !config.denial_window_days.is_finite() || config.denial_window_days <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "time.denial_window_days".to_string(),
            message: format!("Must be positive, got {}", config.denial_window_days),
        });
    }

    let cells = [
        ("eligible.future", config.curves.eligible.future),
        ("eligible.past", config.curves.eligible.past),
        ("not_eligible.future", config.curves.not_eligible.future),
        ("not_eligible.past", config.curves.not_eligible.past),
        ("no_info.future", config.curves.no_info.future),
        ("no_info.past", config.curves.no_info.past),
        ("unestablished.future", config.curves.unestablished.future),
        ("unestablished.past", config.curves.unestablished.past),
    ];

    for (name, spec) in cells {
        validate_curve(&format!("time.curves.{}", name), spec)?;
    }

    Ok(())
}

fn validate_curve(field: &str, spec: CurveSpec) -> ValidationResult<()> {
    let coefficient = match spec {
        CurveSpec::Constant => return Ok(()),
        CurveSpec::ExpDecay { rate } => rate,
        CurveSpec::LinearGrowth { slope } => slope,
        CurveSpec::DenialScaledDecay { rate } => rate,
    };

    if !coefficient.is_finite() || coefficient < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Coefficient must be non-negative, got {}", coefficient),
        });
    }

    Ok(())
}

fn validate_risk(config: &RiskConfig) -> ValidationResult<()> {
    if !config.retro_denial_horizon_days.is_finite() || config.retro_denial_horizon_days <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "risk.retro_denial_horizon_days".to_string(),
            message: format!("Must be positive, got {}", config.retro_denial_horizon_days),
        });
    }

    if let Some(rate) = config.tense_scaling_rate {
        if !rate.is_finite() || rate < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "risk.tense_scaling_rate".to_string(),
                message: format!("Must be non-negative, got {}", rate),
            });
        }
    }

    Ok(())
}

fn validate_aggregation(config: &AggregationConfig) -> ValidationResult<()> {
    if !config.time_decay_days.is_finite() || config.time_decay_days <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "aggregation.time_decay_days".to_string(),
            message: format!("Must be positive, got {}", config.time_decay_days),
        });
    }

    let weights = [
        ("scheduled", config.status_weights.scheduled),
        ("completed", config.status_weights.completed),
        ("cancelled", config.status_weights.cancelled),
    ];

    for (name, weight) in weights {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("aggregation.status_weights.{}", name),
                message: format!("Must be non-negative, got {}", weight),
            });
        }
    }

    let weight_sum = config.status_weights.scheduled
        + config.status_weights.completed
        + config.status_weights.cancelled;
    if weight_sum <= 0.0 {
        return Err(ValidationError::SemanticError(
            "aggregation.status_weights must have positive sum".to_string(),
        ));
    }

    Ok(())
}
