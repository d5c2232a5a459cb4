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

    #[error("Invalid registry URL format")]
    InvalidRegistryUrl,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("At least one accepted analysis type is required")]
    NoAcceptedTypes,

    #[error("Retry attempts must be between 1 and {max}")]
    InvalidMaxAttempts { max: u32 },

    #[error("Backoff multiplier must be at least 1")]
    InvalidBackoffMultiplier,

    #[error("Max backoff must not be shorter than the initial backoff")]
    InvalidMaxBackoff,

    #[error("max_in_flight must be at least 1")]
    InvalidConcurrency,

    #[error("Content type must not be empty")]
    EmptyContentType,
}
