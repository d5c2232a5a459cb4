//! RdpcClient - GraphQL client for the analysis registry.
//!
//! Issues a single `GetAnalysisDetails` query per lookup and maps the answer
//! onto the [`AnalysisRegistry`] port.
//!
//! # Configuration
//!
//! ```ignore
//! let config = RdpcConfig::new("https://rdpc.example.org/graphql")
//!     .with_timeout(Duration::from_secs(30))
//!     .with_auth_token(token);
//!
//! let client = RdpcClient::new(config)?;
//! ```
//!
//! # Response mapping
//!
//! | Response | Result |
//! |----------|--------|
//! | `data` null, `analyses` null, or `[]` | `NotFound` (retryable) |
//! | First analysis fails to decode | `Incompatible` (retryable) |
//! | Errors without data, unreadable body | `MalformedResponse` |
//! | Non-2xx status | `Status` |
//! | Connect failure / timeout | `Network` / `Timeout` |

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::debug;

use crate::domain::analysis::AnalysisRecord;
use crate::domain::foundation::AnalysisId;
use crate::ports::{AnalysisRegistry, RegistryError};

use super::dto::AnalysisDto;

/// GraphQL document sent for every lookup.
pub const GET_ANALYSIS_DETAILS_QUERY: &str = r#"query GetAnalysisDetails($analysisId: String) {
  analyses(filter: { analysisId: $analysisId }) {
    analysisId
    analysisType
    analysisState
    studyId
    donors {
      donorId
    }
    files {
      dataType
    }
    experiment
  }
}"#;

/// Configuration for the registry client.
#[derive(Debug)]
pub struct RdpcConfig {
    /// GraphQL endpoint.
    pub url: String,
    /// Request timeout (connect, read, and total).
    pub timeout: Duration,
    /// Optional bearer token.
    auth_token: Option<Secret<String>>,
}

impl RdpcConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(60),
            auth_token: None,
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends `Authorization: Bearer <token>` with every query.
    pub fn with_auth_token(mut self, token: Secret<String>) -> Self {
        self.auth_token = Some(token);
        self
    }

    fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_ref().map(|t| t.expose_secret().as_str())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a> {
    query: &'static str,
    operation_name: &'static str,
    variables: Variables<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Variables<'a> {
    analysis_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<AnalysesData>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct AnalysesData {
    #[serde(default)]
    analyses: Option<Vec<JsonValue>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Registry client over GraphQL/HTTP.
pub struct RdpcClient {
    config: RdpcConfig,
    client: Client,
}

impl RdpcClient {
    pub fn new(config: RdpcConfig) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| RegistryError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.url
    }

    async fn send_query(&self, analysis_id: &AnalysisId) -> Result<Response, RegistryError> {
        let body = GraphQlRequest {
            query: GET_ANALYSIS_DETAILS_QUERY,
            operation_name: "GetAnalysisDetails",
            variables: Variables {
                analysis_id: analysis_id.as_str(),
            },
        };

        let mut request = self.client.post(&self.config.url).json(&body);
        if let Some(token) = self.config.auth_token() {
            request = request.bearer_auth(token);
        }

        request.send().await.map_err(|e| {
            if e.is_timeout() {
                RegistryError::Timeout {
                    timeout_secs: self.config.timeout.as_secs(),
                }
            } else if e.is_connect() {
                RegistryError::network(format!("Connection failed: {}", e))
            } else {
                RegistryError::network(e.to_string())
            }
        })
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, RegistryError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(RegistryError::Status {
            status: status.as_u16(),
            message,
        })
    }

    /// Picks the first analysis out of a decoded envelope.
    fn first_analysis(
        analysis_id: &AnalysisId,
        envelope: GraphQlResponse,
    ) -> Result<AnalysisRecord, RegistryError> {
        let analyses = match envelope.data {
            Some(data) => data.analyses,
            None => {
                if let Some(errors) = envelope.errors.filter(|errs| !errs.is_empty()) {
                    let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
                    return Err(RegistryError::MalformedResponse(messages.join("; ")));
                }
                None
            }
        };

        let first = analyses
            .and_then(|list| list.into_iter().next())
            .ok_or_else(|| RegistryError::not_found(analysis_id.as_str()))?;

        let dto: AnalysisDto = serde_json::from_value(first)
            .map_err(|e| RegistryError::incompatible(analysis_id.as_str(), e.to_string()))?;

        dto.into_record()
            .map_err(|e| RegistryError::incompatible(analysis_id.as_str(), e.to_string()))
    }
}

#[async_trait]
impl AnalysisRegistry for RdpcClient {
    async fn get_analysis_details(
        &self,
        analysis_id: &AnalysisId,
    ) -> Result<AnalysisRecord, RegistryError> {
        debug!(analysis_id = %analysis_id, endpoint = %self.config.url, "Querying registry");

        let response = self.send_query(analysis_id).await?;
        let response = self.handle_response_status(response).await?;

        let envelope: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::MalformedResponse(format!("Failed to parse response: {}", e)))?;

        Self::first_analysis(analysis_id, envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id() -> AnalysisId {
        AnalysisId::new("A1").unwrap()
    }

    fn envelope(value: JsonValue) -> GraphQlResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn config_defaults_to_sixty_second_timeout() {
        let config = RdpcConfig::new("http://localhost:8080/graphql");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.auth_token().is_none());
    }

    #[test]
    fn config_exposes_token_only_internally() {
        let config = RdpcConfig::new("http://localhost")
            .with_auth_token(Secret::new("s3cret".to_string()));
        assert_eq!(config.auth_token(), Some("s3cret"));
        assert!(!format!("{:?}", config).contains("s3cret"));
    }

    #[test]
    fn request_body_names_operation_and_variables() {
        let body = GraphQlRequest {
            query: GET_ANALYSIS_DETAILS_QUERY,
            operation_name: "GetAnalysisDetails",
            variables: Variables { analysis_id: "A1" },
        };

        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["operationName"], "GetAnalysisDetails");
        assert_eq!(value["variables"]["analysisId"], "A1");
    }

    #[test]
    fn takes_first_analysis() {
        let result = RdpcClient::first_analysis(
            &id(),
            envelope(json!({"data": {"analyses": [
                {"analysisId": "A1", "analysisType": "sequencing_experiment", "studyId": "S1"},
                {"analysisId": "A1", "analysisType": "other", "studyId": "S2"}
            ]}})),
        );

        assert_eq!(result.unwrap().study_id(), "S1");
    }

    #[test]
    fn empty_or_missing_analyses_is_not_found() {
        for body in [
            json!({"data": {"analyses": []}}),
            json!({"data": {"analyses": null}}),
            json!({"data": {}}),
            json!({"data": null}),
        ] {
            let err = RdpcClient::first_analysis(&id(), envelope(body)).unwrap_err();
            assert_eq!(err, RegistryError::not_found("A1"));
        }
    }

    #[test]
    fn undecodable_analysis_is_incompatible() {
        let err = RdpcClient::first_analysis(
            &id(),
            envelope(json!({"data": {"analyses": [{"analysisId": 42}]}})),
        )
        .unwrap_err();

        assert!(matches!(err, RegistryError::Incompatible { .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn errors_without_data_are_malformed() {
        let err = RdpcClient::first_analysis(
            &id(),
            envelope(json!({"data": null, "errors": [{"message": "boom"}]})),
        )
        .unwrap_err();

        assert_eq!(err, RegistryError::MalformedResponse("boom".to_string()));
        assert!(!err.is_retryable());
    }
}
