//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, event transport types, and error types
//! shared by the analysis pipeline.

mod errors;
mod events;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{DomainEvent, EventId, MessageMetadata, OutboundMessage, JSON_ENCODING};
pub use ids::AnalysisId;
pub use timestamp::Timestamp;
