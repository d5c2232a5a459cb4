//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `INGESTION_NODE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use ingestion_node::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Resolving against {}", config.registry.url);
//! ```

mod acceptance;
mod error;
mod pipeline;
mod registry;
mod retry;

pub use acceptance::AcceptanceConfig;
pub use error::{ConfigError, ValidationError};
pub use pipeline::{LogFormat, PipelineConfig};
pub use registry::RegistryConfig;
pub use retry::RetryConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Registry endpoint (GraphQL)
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Accepted analysis types and states
    #[serde(default)]
    pub acceptance: AcceptanceConfig,

    /// Not-found retry schedule
    #[serde(default)]
    pub retry: RetryConfig,

    /// Concurrency, inbound shape, outbound content type, logging
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `INGESTION_NODE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `INGESTION_NODE__REGISTRY__URL=...` -> `registry.url = ...`
    /// - `INGESTION_NODE__RETRY__MAX_ATTEMPTS=15` -> `retry.max_attempts = 15`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("INGESTION_NODE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.registry.validate()?;
        self.acceptance.validate()?;
        self.retry.validate()?;
        self.pipeline.validate()?;
        Ok(())
    }
}
