//! Pipeline runtime configuration

use serde::Deserialize;

use crate::domain::inbound::InboundMode;

use super::error::ValidationError;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Payload shape on the inbound channel
    #[serde(default)]
    pub inbound_mode: InboundMode,

    /// Maximum analyses processed concurrently
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// Content type stamped on outbound messages
    #[serde(default = "default_content_type")]
    pub content_type: String,

    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output format
    #[serde(default)]
    pub log_format: LogFormat,
}

impl PipelineConfig {
    /// Validate pipeline configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_in_flight == 0 {
            return Err(ValidationError::InvalidConcurrency);
        }
        if self.content_type.trim().is_empty() {
            return Err(ValidationError::EmptyContentType);
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            inbound_mode: InboundMode::default(),
            max_in_flight: default_max_in_flight(),
            content_type: default_content_type(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

fn default_max_in_flight() -> usize {
    16
}

fn default_content_type() -> String {
    "application/vnd.GraphEvent+json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
