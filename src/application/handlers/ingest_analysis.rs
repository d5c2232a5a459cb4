//! AnalysisPipeline - Drives inbound items through resolve, filter, transform
//! and emit.
//!
//! Each item runs in its own task so one failure never blocks or kills the
//! others. Concurrency is bounded by a semaphore acquired *before* the next
//! item is pulled from the inbound stream, which gives natural backpressure.
//!
//! ```text
//! notification ─┬─ pre-filter ─ resolve ─┐
//!               │                        ├─ filter ─ transform ─ publish
//! hydrated ─────┴────────────────────────┘
//!                       failures ─────────────────────────────▶ dead letter
//! ```

use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::sync::{watch, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, info_span, Instrument};

use crate::domain::analysis::{
    AcceptanceFilter, EventTransformer, Verdict, GRAPH_EVENT_SCHEMA,
};
use crate::domain::foundation::{AnalysisId, DomainError, EventId, OutboundMessage};
use crate::domain::inbound::InboundPayload;
use crate::ports::{DeadLetter, DeadLetterSink, EventPublisher};

use super::resolve_analysis::{AnalysisResolver, ResolveError};
use super::shutdown::shutdown_requested;

/// Runtime settings for the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Maximum items processed concurrently.
    pub max_in_flight: usize,

    /// Content type stamped on every outbound message.
    pub content_type: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_in_flight: 16,
            content_type: OutboundMessage::content_type_for(GRAPH_EVENT_SCHEMA),
        }
    }
}

impl PipelineSettings {
    /// Create settings with a different concurrency bound.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }

    /// Create settings with a different outbound content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

/// What happened to a single inbound item.
#[derive(Debug, Clone)]
pub enum ProcessOutcome {
    /// A graph event was published.
    Emitted { event_id: EventId },

    /// Dropped by the acceptance filter. Not an error.
    Rejected(Verdict),

    /// Resolution, serialization, or publishing failed; dead-lettered.
    Failed(DomainError),

    /// Shutdown interrupted processing. Not dead-lettered.
    Cancelled,
}

impl ProcessOutcome {
    pub fn is_emitted(&self) -> bool {
        matches!(self, ProcessOutcome::Emitted { .. })
    }
}

/// Counters for one `run`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub received: u64,
    pub emitted: u64,
    pub rejected: u64,
    pub failed: u64,
    pub cancelled: u64,
}

impl PipelineStats {
    pub fn record(&mut self, outcome: &ProcessOutcome) {
        match outcome {
            ProcessOutcome::Emitted { .. } => self.emitted += 1,
            ProcessOutcome::Rejected(_) => self.rejected += 1,
            ProcessOutcome::Failed(_) => self.failed += 1,
            ProcessOutcome::Cancelled => self.cancelled += 1,
        }
    }

    /// Items that reached a terminal outcome.
    pub fn completed(&self) -> u64 {
        self.emitted + self.rejected + self.failed + self.cancelled
    }

    fn record_join(&mut self, joined: Result<ProcessOutcome, JoinError>) {
        match joined {
            Ok(outcome) => self.record(&outcome),
            Err(e) => {
                error!(error = %e, "Analysis task aborted");
                self.failed += 1;
            }
        }
    }
}

/// Coordinator for the ingestion flow.
pub struct AnalysisPipeline {
    resolver: AnalysisResolver,
    filter: AcceptanceFilter,
    publisher: Arc<dyn EventPublisher>,
    dead_letters: Option<Arc<dyn DeadLetterSink>>,
    settings: PipelineSettings,
}

impl AnalysisPipeline {
    pub fn new(
        resolver: AnalysisResolver,
        filter: AcceptanceFilter,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            resolver,
            filter,
            publisher,
            dead_letters: None,
            settings: PipelineSettings::default(),
        }
    }

    /// Route permanently failed items to `sink` instead of only logging them.
    pub fn with_dead_letter_sink(mut self, sink: Arc<dyn DeadLetterSink>) -> Self {
        self.dead_letters = Some(sink);
        self
    }

    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Processes one inbound item to a terminal outcome.
    ///
    /// Never panics on bad data and never returns an error: every failure is
    /// logged, dead-lettered, and reported as [`ProcessOutcome::Failed`].
    pub async fn process(&self, payload: InboundPayload) -> ProcessOutcome {
        let span = info_span!("analysis", analysis_id = %payload.analysis_id());
        self.process_inner(payload).instrument(span).await
    }

    async fn process_inner(&self, payload: InboundPayload) -> ProcessOutcome {
        let record = match payload {
            InboundPayload::Notification(notification) => {
                info!(analysis_type = %notification.analysis_type, "Received analysis notification");

                // Drop early so unwanted types never hit the registry.
                let verdict = self.filter.evaluate(&notification);
                if !verdict.is_accepted() {
                    debug!(reason = %verdict, "Skipping analysis");
                    return ProcessOutcome::Rejected(verdict);
                }

                match self.resolver.resolve(&notification.analysis_id).await {
                    Ok(record) => record,
                    Err(ResolveError::Cancelled { attempts, .. }) => {
                        info!(attempts, "Resolution cancelled by shutdown");
                        return ProcessOutcome::Cancelled;
                    }
                    Err(e) => {
                        let attempts = e.attempts();
                        return self
                            .fail(
                                notification.analysis_id,
                                notification.analysis_type,
                                e.into(),
                                attempts,
                            )
                            .await;
                    }
                }
            }
            InboundPayload::Hydrated(record) => {
                info!(analysis_type = %record.analysis_type(), "Received hydrated analysis");
                record
            }
        };

        let verdict = self.filter.evaluate(&record);
        if !verdict.is_accepted() {
            debug!(reason = %verdict, "Skipping analysis");
            return ProcessOutcome::Rejected(verdict);
        }

        let event = EventTransformer::transform(&record);
        let message = match OutboundMessage::from_event(&event) {
            Ok(message) => message
                .with_content_type(&self.settings.content_type)
                .with_correlation_id(record.analysis_id().to_string()),
            Err(e) => {
                return self
                    .fail(record.analysis_id().clone(), record.analysis_type(), e, 0)
                    .await;
            }
        };

        match self.publisher.publish(message).await {
            Ok(()) => {
                info!(
                    event_id = %event.id,
                    donors = event.donor_ids.len(),
                    files = event.files.len(),
                    "Emitted graph event"
                );
                ProcessOutcome::Emitted { event_id: event.id }
            }
            Err(e) => {
                self.fail(record.analysis_id().clone(), record.analysis_type(), e, 0)
                    .await
            }
        }
    }

    async fn fail(
        &self,
        analysis_id: AnalysisId,
        analysis_type: impl Into<String>,
        error: DomainError,
        attempts: u32,
    ) -> ProcessOutcome {
        error!(code = %error.code, attempts, error = %error, "Analysis processing failed");

        if let Some(sink) = &self.dead_letters {
            let letter = DeadLetter::new(analysis_id, analysis_type, error.clone(), attempts);
            if let Err(e) = sink.send(letter).await {
                error!(sink = sink.name(), error = %e, "Failed to dead-letter analysis");
            }
        }

        ProcessOutcome::Failed(error)
    }

    /// Consumes `inbound` until it ends or shutdown is signalled.
    ///
    /// On shutdown no further items are pulled; items already in flight are
    /// awaited (the resolver abandons its retries on the same signal).
    pub async fn run<S>(self: Arc<Self>, inbound: S, mut shutdown: watch::Receiver<bool>) -> PipelineStats
    where
        S: Stream<Item = InboundPayload>,
    {
        futures::pin_mut!(inbound);

        let permits = Arc::new(Semaphore::new(self.settings.max_in_flight.max(1)));
        let mut tasks = JoinSet::new();
        let mut stats = PipelineStats::default();

        info!(max_in_flight = self.settings.max_in_flight, "Pipeline started");

        loop {
            let permit = tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => break,
                permit = Arc::clone(&permits).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let next = tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => break,
                next = inbound.next() => next,
            };

            let Some(payload) = next else {
                break;
            };
            stats.received += 1;

            let pipeline = Arc::clone(&self);
            tasks.spawn(async move {
                let _permit = permit;
                pipeline.process(payload).await
            });

            while let Some(joined) = tasks.try_join_next() {
                stats.record_join(joined);
            }
        }

        debug!(in_flight = tasks.len(), "Intake stopped, draining");
        while let Some(joined) = tasks.join_next().await {
            stats.record_join(joined);
        }

        info!(
            received = stats.received,
            emitted = stats.emitted,
            rejected = stats.rejected,
            failed = stats.failed,
            cancelled = stats.cancelled,
            "Pipeline stopped"
        );

        stats
    }
}
