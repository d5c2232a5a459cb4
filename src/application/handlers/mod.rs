//! Application handlers.
//!
//! Handlers that orchestrate domain operations across ports.

mod ingest_analysis;
mod resolve_analysis;
mod shutdown;

pub use ingest_analysis::{AnalysisPipeline, PipelineSettings, PipelineStats, ProcessOutcome};
pub use resolve_analysis::{AnalysisResolver, ResolveError, RetryPolicy};
pub use shutdown::shutdown_requested;
