//! Error types for configuration validation and loading

use std::path::PathBuf;
use thiserror::Error;

/// A configuration parameter violated its constraint.
///
/// Raised by [`crate::SimulationConfig::validate`] before the monthly loop
/// starts. Every variant names the offending field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a fraction in [0, 1], got {value}")]
    RateOutOfRange { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: f64 },

    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} must be greater than zero, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("simulation horizon must be between 1 and {max} months, got {0}", max = crate::config::MAX_MONTHS)]
    InvalidHorizon(u32),

    #[error("moratorium of {moratorium_months} months must be shorter than the loan tenure of {tenure_months} months")]
    MoratoriumExceedsTenure {
        moratorium_months: u32,
        tenure_months: u32,
    },

    #[error("invalid husbandry timing {field}: {reason}")]
    InvalidTiming { field: &'static str, reason: &'static str },

    #[error("{field} must be a whole count between 0 and {max}, got {value}", max = u32::MAX)]
    InvalidCount { field: &'static str, value: f64 },
}

/// Failure while reading a configuration file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read config {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}
