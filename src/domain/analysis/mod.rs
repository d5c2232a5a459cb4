//! Analysis Module - Pure domain services for analysis ingestion.
//!
//! # Components
//!
//! - `AnalysisNotification` - Minimal trigger announcing a published analysis
//! - `AnalysisRecord` - Resolved, immutable analysis with deduplicated donors
//! - `AcceptanceFilter` - Case-insensitive type/state predicate
//! - `EventTransformer` - Record to `GraphEvent` mapping
//! - `experiment` - Tolerant extraction of the experimental strategy
//!
//! Nothing here performs I/O. Resolution and emission live behind ports.

mod acceptance;
pub mod experiment;
mod graph_event;
mod notification;
mod record;
mod transformer;

pub use acceptance::{AcceptanceFilter, AcceptanceSubject, Verdict};
pub use experiment::MappingError;
pub use graph_event::{GraphEvent, GraphEventFile, GRAPH_EVENT_SCHEMA};
pub use notification::AnalysisNotification;
pub use record::{AnalysisFile, AnalysisRecord, AnalysisRecordBuilder};
pub use transformer::EventTransformer;
