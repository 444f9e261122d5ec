//! Error types for bmi-advisor
//!
//! BMI errors block the whole result. Advice errors are isolated: callers
//! catch them and substitute a fallback fragment next to the BMI value.

use thiserror::Error;

/// Main error type for the BMI advisor
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Height or weight absent, non-numeric, non-finite or out of range
    #[error("Invalid measurement: {reason}")]
    InvalidMeasurement { reason: String },

    /// The external advice service failed or returned an unusable payload
    #[error("Advice unavailable: {0}")]
    AdviceUnavailable(String),

    /// Calculator state machine errors
    #[error("Invalid calculator transition from {from} on {event}")]
    InvalidTransition { from: String, event: String },

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AdvisorError {
    /// Shorthand for an `InvalidMeasurement` with a reason
    pub fn invalid_measurement(reason: impl Into<String>) -> Self {
        AdvisorError::InvalidMeasurement {
            reason: reason.into(),
        }
    }

    /// True when the error belongs to the advice side and must not hide a BMI result
    pub fn is_advice_failure(&self) -> bool {
        matches!(self, AdvisorError::AdviceUnavailable(_) | AdvisorError::HttpError(_))
    }
}

/// Result type alias for advisor operations
pub type Result<T> = std::result::Result<T, AdvisorError>;
