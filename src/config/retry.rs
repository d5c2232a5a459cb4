//! Registry retry configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_ATTEMPTS_LIMIT: u32 = 100;

/// Retry schedule for analyses the registry cannot find yet
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Total lookups per analysis, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay after the first failed lookup, in seconds
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: u64,

    /// Growth factor per attempt; 1 keeps the interval fixed
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: u32,

    /// Upper bound on a single delay, in seconds
    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,
}

impl RetryConfig {
    pub fn backoff(&self) -> Duration {
        Duration::from_secs(self.backoff_secs)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_secs(self.max_backoff_secs)
    }

    /// Validate retry configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_attempts == 0 || self.max_attempts > MAX_ATTEMPTS_LIMIT {
            return Err(ValidationError::InvalidMaxAttempts {
                max: MAX_ATTEMPTS_LIMIT,
            });
        }
        if self.backoff_multiplier == 0 {
            return Err(ValidationError::InvalidBackoffMultiplier);
        }
        if self.max_backoff_secs < self.backoff_secs {
            return Err(ValidationError::InvalidMaxBackoff);
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_secs: default_backoff_secs(),
            backoff_multiplier: default_backoff_multiplier(),
            max_backoff_secs: default_max_backoff_secs(),
        }
    }
}

fn default_max_attempts() -> u32 {
    15
}

fn default_backoff_secs() -> u64 {
    3
}

fn default_backoff_multiplier() -> u32 {
    1
}

fn default_max_backoff_secs() -> u64 {
    60
}
