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
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid billing URL: {0}")]
    InvalidBillingUrl(String),

    #[error("Invalid request timeout (must be 1-60 seconds)")]
    InvalidTimeout,

    #[error("Too many connect retries (maximum 3)")]
    TooManyRetries,

    #[error("Invalid token refresh margin (must be 0-300 seconds)")]
    InvalidRefreshMargin,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
