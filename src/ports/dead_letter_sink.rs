//! DeadLetterSink port - Destination for items the pipeline gave up on.
//!
//! Without a dedicated sink, permanently failed items are only logged.
//! Plugging in a sink makes those losses recoverable.

use async_trait::async_trait;

use crate::domain::foundation::{AnalysisId, DomainError, Timestamp};

/// An item that failed resolution or emission.
#[derive(Debug, Clone)]
pub struct DeadLetter {
    pub analysis_id: AnalysisId,
    pub analysis_type: String,
    /// Failure that ended processing.
    pub error: DomainError,
    /// Registry lookups performed before giving up (0 when not resolved).
    pub attempts: u32,
    pub failed_at: Timestamp,
}

impl DeadLetter {
    pub fn new(
        analysis_id: AnalysisId,
        analysis_type: impl Into<String>,
        error: DomainError,
        attempts: u32,
    ) -> Self {
        Self {
            analysis_id,
            analysis_type: analysis_type.into(),
            error,
            attempts,
            failed_at: Timestamp::now(),
        }
    }
}

/// Port for dead-letter routing.
#[async_trait]
pub trait DeadLetterSink: Send + Sync {
    /// Record a failed item. Errors are logged by the caller and never retried.
    async fn send(&self, letter: DeadLetter) -> Result<(), DomainError>;

    /// Sink name for logging.
    fn name(&self) -> &'static str;
}
