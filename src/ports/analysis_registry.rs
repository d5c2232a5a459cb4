//! AnalysisRegistry port - Interface for fetching analysis details.
//!
//! The pipeline depends only on this contract, never on the concrete
//! transport (GraphQL over HTTP in production, stubs in tests).

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::analysis::AnalysisRecord;
use crate::domain::foundation::{AnalysisId, DomainError, ErrorCode};

/// Errors returned by registry implementations.
///
/// Two classes matter to callers:
/// - **Not found** (`NotFound`, `Incompatible`): the registry may not have
///   indexed the analysis yet, so the lookup is worth retrying.
/// - **Transport** (everything else): the registry is unreachable or answered
///   with a broken envelope; retrying here would only mask an outage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No analysis matched the identifier.
    #[error("analysis {analysis_id} not found")]
    NotFound { analysis_id: String },

    /// An analysis came back but does not fit the expected schema.
    #[error("analysis {analysis_id} is incompatible with the analysis schema: {reason}")]
    Incompatible { analysis_id: String, reason: String },

    /// Connection-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Non-success HTTP status.
    #[error("registry returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response envelope was unreadable or reported query errors.
    #[error("malformed registry response: {0}")]
    MalformedResponse(String),
}

impl RegistryError {
    pub fn not_found(analysis_id: impl Into<String>) -> Self {
        RegistryError::NotFound {
            analysis_id: analysis_id.into(),
        }
    }

    pub fn incompatible(analysis_id: impl Into<String>, reason: impl Into<String>) -> Self {
        RegistryError::Incompatible {
            analysis_id: analysis_id.into(),
            reason: reason.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        RegistryError::Network(message.into())
    }

    /// True for failures that indexing lag can explain.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RegistryError::NotFound { .. } | RegistryError::Incompatible { .. }
        )
    }
}

impl From<RegistryError> for DomainError {
    fn from(err: RegistryError) -> Self {
        let code = if err.is_retryable() {
            ErrorCode::AnalysisNotFound
        } else {
            ErrorCode::RegistryUnavailable
        };
        DomainError::new(code, err.to_string())
    }
}

/// Port for the upstream analysis registry.
///
/// Implementations perform exactly one lookup per call: no retries and no
/// caching. Retry policy belongs to the resolver.
#[async_trait]
pub trait AnalysisRegistry: Send + Sync {
    /// Fetches the full analysis record for `analysis_id`.
    async fn get_analysis_details(
        &self,
        analysis_id: &AnalysisId,
    ) -> Result<AnalysisRecord, RegistryError>;
}
