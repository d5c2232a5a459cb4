//! AnalysisResolver - Turns an analysis identifier into a full record.
//!
//! Publication and search indexing upstream are eventually consistent: a
//! notification can arrive before the registry can answer for it. The
//! resolver absorbs that lag with a bounded retry loop on not-found answers.
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `max_attempts` | 15 | Registry lookups before giving up |
//! | `backoff` | 3s | Delay after the first failed lookup |
//! | `multiplier` | 1 | Growth factor per attempt (1 = fixed interval) |
//! | `max_backoff` | 60s | Upper bound on any single delay |
//!
//! Transport failures are never retried here. A shutdown signal aborts the
//! loop during a lookup or a backoff sleep.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::domain::analysis::AnalysisRecord;
use crate::domain::foundation::{AnalysisId, DomainError, ErrorCode};
use crate::ports::{AnalysisRegistry, RegistryError};

use super::shutdown::shutdown_requested_opt;

/// Bounded retry schedule for not-found lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total registry lookups, including the first. Values below 1 act as 1.
    pub max_attempts: u32,

    /// Delay after the first failed lookup.
    pub backoff: Duration,

    /// Each subsequent delay is multiplied by this factor.
    pub multiplier: u32,

    /// Cap on a single delay.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 15,
            backoff: Duration::from_secs(3),
            multiplier: 1,
            max_backoff: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Fixed-interval policy.
    pub fn fixed(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
            multiplier: 1,
            max_backoff: backoff,
        }
    }

    /// Create policy with exponential growth.
    pub fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier.max(1);
        self
    }

    /// Create policy with a different delay cap.
    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let factor = self.multiplier.max(1).saturating_pow(exponent);
        let delay = self.backoff.saturating_mul(factor);
        delay.min(self.max_backoff.max(self.backoff))
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Why a record could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Retry budget exhausted on not-found answers.
    #[error("analysis {analysis_id} not found after {attempts} attempts: {last_error}")]
    NotFound {
        analysis_id: String,
        attempts: u32,
        last_error: RegistryError,
    },

    /// Registry unreachable or answered with a broken envelope.
    #[error("registry failure resolving {analysis_id}: {source}")]
    Transport {
        analysis_id: String,
        attempts: u32,
        #[source]
        source: RegistryError,
    },

    /// Shutdown requested before the record was resolved.
    #[error("resolution of {analysis_id} cancelled after {attempts} attempts")]
    Cancelled { analysis_id: String, attempts: u32 },
}

impl ResolveError {
    /// Registry lookups performed before this error.
    pub fn attempts(&self) -> u32 {
        match self {
            ResolveError::NotFound { attempts, .. }
            | ResolveError::Transport { attempts, .. }
            | ResolveError::Cancelled { attempts, .. } => *attempts,
        }
    }
}

impl From<ResolveError> for DomainError {
    fn from(err: ResolveError) -> Self {
        let code = match &err {
            ResolveError::NotFound { .. } => ErrorCode::AnalysisNotFound,
            ResolveError::Transport { .. } => ErrorCode::RegistryUnavailable,
            ResolveError::Cancelled { .. } => ErrorCode::Cancelled,
        };
        let attempts = err.attempts();
        DomainError::new(code, err.to_string()).with_detail("attempts", attempts.to_string())
    }
}

/// Resolves analysis records through the registry port.
///
/// Stateless apart from its configuration; safe to share across tasks.
pub struct AnalysisResolver {
    registry: Arc<dyn AnalysisRegistry>,
    policy: RetryPolicy,
    shutdown: Option<watch::Receiver<bool>>,
}

impl AnalysisResolver {
    pub fn new(registry: Arc<dyn AnalysisRegistry>, policy: RetryPolicy) -> Self {
        Self {
            registry,
            policy,
            shutdown: None,
        }
    }

    /// Abort in-flight resolutions when `true` is sent on this channel.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches the record, retrying not-found answers per the policy.
    pub async fn resolve(&self, analysis_id: &AnalysisId) -> Result<AnalysisRecord, ResolveError> {
        let max_attempts = self.policy.attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let lookup = tokio::select! {
                biased;
                _ = shutdown_requested_opt(self.shutdown.as_ref()) => {
                    return Err(self.cancelled(analysis_id, attempt - 1));
                }
                result = self.registry.get_analysis_details(analysis_id) => result,
            };

            let error = match lookup {
                Ok(record) => {
                    if attempt > 1 {
                        info!(analysis_id = %analysis_id, attempt, "Resolved analysis after retry");
                    } else {
                        debug!(analysis_id = %analysis_id, "Resolved analysis");
                    }
                    return Ok(record);
                }
                Err(e) => e,
            };

            if !error.is_retryable() {
                return Err(ResolveError::Transport {
                    analysis_id: analysis_id.to_string(),
                    attempts: attempt,
                    source: error,
                });
            }

            if attempt >= max_attempts {
                return Err(ResolveError::NotFound {
                    analysis_id: analysis_id.to_string(),
                    attempts: attempt,
                    last_error: error,
                });
            }

            let delay = self.policy.delay_after(attempt);
            warn!(
                analysis_id = %analysis_id,
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Analysis not available yet, retrying"
            );

            tokio::select! {
                biased;
                _ = shutdown_requested_opt(self.shutdown.as_ref()) => {
                    return Err(self.cancelled(analysis_id, attempt));
                }
                _ = sleep(delay) => {}
            }
        }
    }

    fn cancelled(&self, analysis_id: &AnalysisId, attempts: u32) -> ResolveError {
        ResolveError::Cancelled {
            analysis_id: analysis_id.to_string(),
            attempts,
        }
    }
}
