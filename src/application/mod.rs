//! Application layer - Handlers that coordinate domain logic and ports.
//!
//! The resolver owns the retry policy; the pipeline owns concurrency,
//! filtering, and failure routing.

pub mod handlers;

pub use handlers::{
    AnalysisPipeline, AnalysisResolver, PipelineSettings, PipelineStats, ProcessOutcome,
    ResolveError, RetryPolicy,
};
