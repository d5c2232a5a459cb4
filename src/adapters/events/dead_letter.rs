//! Dead-letter sinks.
//!
//! - `LoggingDeadLetterSink` - Emits a structured error record per item
//! - `InMemoryDeadLetterSink` - Captures letters for assertions (testing only)

use async_trait::async_trait;
use std::sync::RwLock;
use tracing::error;

use crate::domain::foundation::DomainError;
use crate::ports::{DeadLetter, DeadLetterSink};

/// Writes each dead letter as a structured log line.
///
/// Used when no durable destination is configured, so that losses are at
/// least searchable in the log pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingDeadLetterSink;

#[async_trait]
impl DeadLetterSink for LoggingDeadLetterSink {
    async fn send(&self, letter: DeadLetter) -> Result<(), DomainError> {
        error!(
            target: "dead_letter",
            analysis_id = %letter.analysis_id,
            analysis_type = %letter.analysis_type,
            code = %letter.error.code,
            attempts = letter.attempts,
            failed_at = %letter.failed_at.as_datetime().to_rfc3339(),
            error = %letter.error.message,
            "Dead-lettered analysis"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Captures dead letters in memory.
///
/// # Panics
///
/// Methods may panic if the internal lock is poisoned. Testing only.
#[derive(Default)]
pub struct InMemoryDeadLetterSink {
    letters: RwLock<Vec<DeadLetter>>,
}

impl InMemoryDeadLetterSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn letters(&self) -> Vec<DeadLetter> {
        self.letters
            .read()
            .expect("InMemoryDeadLetterSink: lock poisoned")
            .clone()
    }

    pub fn count(&self) -> usize {
        self.letters
            .read()
            .expect("InMemoryDeadLetterSink: lock poisoned")
            .len()
    }

    /// True if a letter exists for the given analysis.
    pub fn contains(&self, analysis_id: &str) -> bool {
        self.letters
            .read()
            .expect("InMemoryDeadLetterSink: lock poisoned")
            .iter()
            .any(|l| l.analysis_id.as_str() == analysis_id)
    }
}

#[async_trait]
impl DeadLetterSink for InMemoryDeadLetterSink {
    async fn send(&self, letter: DeadLetter) -> Result<(), DomainError> {
        self.letters
            .write()
            .expect("InMemoryDeadLetterSink: lock poisoned")
            .push(letter);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
