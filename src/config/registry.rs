//! Registry (RDPC) configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_TIMEOUT_SECS: u64 = 300;

/// Registry endpoint configuration
#[derive(Debug, Deserialize)]
pub struct RegistryConfig {
    /// GraphQL endpoint URL
    #[serde(default)]
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Optional bearer token
    #[serde(default)]
    pub auth_token: Option<Secret<String>>,
}

impl RegistryConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate registry configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("INGESTION_NODE__REGISTRY__URL"));
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ValidationError::InvalidRegistryUrl);
        }
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: default_timeout(),
            auth_token: None,
        }
    }
}

fn default_timeout() -> u64 {
    60
}
