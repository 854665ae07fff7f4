//! Error types for the eligibility engine.
//!
//! Structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for the conversational front-end
//!
//! Errors serialize to structured JSON:
//! ```json
//! {
//!   "code": 22,
//!   "category": "input",
//!   "message": "invalid elapsed time for past tense: -3 days",
//!   "recoverable": false,
//!   "context": { "tense": "past", "days": -3.0 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Engine configuration errors (curve rates, thresholds, priors).
    Config,
    /// Malformed case input, rejected before any store access.
    Input,
    /// Observation store access failures.
    Store,
    /// Serialization errors on the JSON contract surfaces.
    Serialization,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Store => write!(f, "store"),
            ErrorCategory::Serialization => write!(f, "serialization"),
        }
    }
}

/// Observation store failures, owned by the store seam.
///
/// Retry and connection pooling belong to the store client beneath the
/// engine; the engine performs each query at most once and never masks a
/// store failure as a probability result.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("observation store unavailable: {0}")]
    Unavailable(String),

    #[error("observation store query failed for filter {filter}: {message}")]
    QueryFailed { filter: String, message: String },
}

/// Unified error type for the eligibility engine.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    // Input errors (20-29)
    #[error("invalid case input: {0}")]
    InvalidInput(String),

    #[error("invalid dimension {dimension}: {message}")]
    InvalidDimension { dimension: String, message: String },

    #[error("invalid elapsed time for {tense} tense: {days} days")]
    InvalidElapsedTime { tense: String, days: f64 },

    #[error("service date required for {tense} tense")]
    MissingServiceDate { tense: String },

    // Store errors (30-39)
    #[error("observation store error: {0}")]
    Store(#[from] StoreError),

    // Serialization errors (40-49)
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the stable error code for this error type.
    ///
    /// Codes are grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Input errors
    /// - 30-39: Store errors
    /// - 40-49: Serialization errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidInput(_) => 20,
            Error::InvalidDimension { .. } => 21,
            Error::InvalidElapsedTime { .. } => 22,
            Error::MissingServiceDate { .. } => 23,
            Error::Store(_) => 30,
            Error::Json(_) => 40,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) => ErrorCategory::Config,

            Error::InvalidInput(_)
            | Error::InvalidDimension { .. }
            | Error::InvalidElapsedTime { .. }
            | Error::MissingServiceDate { .. } => ErrorCategory::Input,

            Error::Store(_) => ErrorCategory::Store,

            Error::Json(_) => ErrorCategory::Serialization,
        }
    }

    /// Returns whether this error is potentially recoverable.
    ///
    /// Configuration and input errors are caller bugs; retrying the same
    /// call cannot succeed. Store errors are often transient and may be
    /// retried by the store client.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) => false,
            Error::InvalidInput(_) => false,
            Error::InvalidDimension { .. } => false,
            Error::InvalidElapsedTime { .. } => false,
            Error::MissingServiceDate { .. } => false,
            Error::Store(_) => true,
            Error::Json(_) => false,
        }
    }
}

/// Structured error response for JSON output.
///
/// Consumed by the conversational front-end for machine-parseable error
/// reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Additional structured context (e.g., dimension, tense).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::InvalidDimension { dimension, .. } => {
                context.insert("dimension".to_string(), serde_json::json!(dimension));
            }
            Error::InvalidElapsedTime { tense, days } => {
                context.insert("tense".to_string(), serde_json::json!(tense));
                context.insert("days".to_string(), serde_json::json!(days));
            }
            Error::MissingServiceDate { tense } => {
                context.insert("tense".to_string(), serde_json::json!(tense));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}
