//! Acceptance filter configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Which analyses the node handles
#[derive(Debug, Clone, Deserialize)]
pub struct AcceptanceConfig {
    /// Comma-separated accepted analysis types
    #[serde(default = "default_analysis_types")]
    pub analysis_types: String,

    /// Comma-separated accepted states; empty accepts any state
    #[serde(default)]
    pub analysis_states: String,
}

impl AcceptanceConfig {
    /// Get accepted types as a vector
    pub fn analysis_types_list(&self) -> Vec<String> {
        split_list(&self.analysis_types)
    }

    /// Get accepted states as a vector
    pub fn analysis_states_list(&self) -> Vec<String> {
        split_list(&self.analysis_states)
    }

    /// Validate acceptance configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.analysis_types_list().is_empty() {
            return Err(ValidationError::NoAcceptedTypes);
        }
        Ok(())
    }
}

impl Default for AcceptanceConfig {
    fn default() -> Self {
        Self {
            analysis_types: default_analysis_types(),
            analysis_states: String::new(),
        }
    }
}

fn default_analysis_types() -> String {
    "sequencing_experiment".to_string()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
