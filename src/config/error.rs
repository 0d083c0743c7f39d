//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid triage thresholds: {0}")]
    InvalidThresholds(String),

    #[error("Unknown red flag in always-urgent set: {0}")]
    UnknownRedFlag(String),

    #[error("Explanation top-K must be at least 1")]
    InvalidTopK,

    #[error("Feature schema version {0} is not supported")]
    UnsupportedSchemaVersion(u32),

    #[error("Invalid AI request timeout")]
    InvalidTimeout,

    #[error("Invalid log level directive: {0}")]
    InvalidLogLevel(String),
}
