//! Extraction of the experimental strategy from the registry's loosely-typed
//! experiment structure.
//!
//! The registry stores `experiment` as free-form JSON. Only one key matters
//! downstream, and a malformed structure must never sink the analysis: callers
//! get a [`MappingError`] they can log, or use [`strategy_or_default`] which
//! logs and falls back to the empty string.

use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::warn;

/// Key holding the strategy inside the experiment map.
pub const EXPERIMENTAL_STRATEGY_KEY: &str = "experimental_strategy";

/// Recoverable failure reading an optional sub-field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("experiment is not a map (found {found})")]
    ExperimentNotAMap { found: &'static str },

    #[error("experiment field '{key}' is not a string (found {found})")]
    StrategyNotAString { key: &'static str, found: &'static str },
}

/// Reads `experimental_strategy` from the experiment structure.
///
/// A missing or null experiment, or a missing or null key, yields an empty
/// string. Anything not shaped as `{ "experimental_strategy": "<string>" }`
/// is a [`MappingError`].
pub fn experimental_strategy(experiment: Option<&JsonValue>) -> Result<String, MappingError> {
    let map = match experiment {
        None | Some(JsonValue::Null) => return Ok(String::new()),
        Some(JsonValue::Object(map)) => map,
        Some(other) => {
            return Err(MappingError::ExperimentNotAMap {
                found: json_kind(other),
            })
        }
    };

    match map.get(EXPERIMENTAL_STRATEGY_KEY) {
        None | Some(JsonValue::Null) => Ok(String::new()),
        Some(JsonValue::String(strategy)) => Ok(strategy.clone()),
        Some(other) => Err(MappingError::StrategyNotAString {
            key: EXPERIMENTAL_STRATEGY_KEY,
            found: json_kind(other),
        }),
    }
}

/// Like [`experimental_strategy`] but logs mapping errors and returns "".
pub fn strategy_or_default(analysis_id: &str, experiment: Option<&JsonValue>) -> String {
    experimental_strategy(experiment).unwrap_or_else(|e| {
        warn!(
            analysis_id = %analysis_id,
            error = %e,
            "Malformed experiment, defaulting experimentalStrategy to empty"
        );
        String::new()
    })
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_strategy_from_map() {
        let experiment = json!({"experimental_strategy": "WGS", "platform": "ILLUMINA"});
        assert_eq!(experimental_strategy(Some(&experiment)).unwrap(), "WGS");
    }

    #[test]
    fn absent_experiment_is_empty() {
        assert_eq!(experimental_strategy(None).unwrap(), "");
        assert_eq!(experimental_strategy(Some(&JsonValue::Null)).unwrap(), "");
    }

    #[test]
    fn absent_key_is_empty() {
        let experiment = json!({"platform": "ILLUMINA"});
        assert_eq!(experimental_strategy(Some(&experiment)).unwrap(), "");
    }

    #[test]
    fn scalar_experiment_is_mapping_error() {
        let result = experimental_strategy(Some(&json!("WGS")));
        assert_eq!(result, Err(MappingError::ExperimentNotAMap { found: "string" }));
    }

    #[test]
    fn non_string_strategy_is_mapping_error() {
        let result = experimental_strategy(Some(&json!({"experimental_strategy": 42})));
        assert_eq!(
            result,
            Err(MappingError::StrategyNotAString {
                key: EXPERIMENTAL_STRATEGY_KEY,
                found: "number"
            })
        );
    }

    #[test]
    fn strategy_or_default_recovers_from_malformed_input() {
        assert_eq!(strategy_or_default("A1", Some(&json!([1, 2, 3]))), "");
        assert_eq!(
            strategy_or_default("A1", Some(&json!({"experimental_strategy": "WXS"}))),
            "WXS"
        );
    }
}
