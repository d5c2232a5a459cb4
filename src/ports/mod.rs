//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the pipeline and the outside world. Adapters implement these ports.
//!
//! - `AnalysisRegistry` - Lookup of full analysis records by identifier
//! - `EventPublisher` - Outbound boundary for canonical events
//! - `DeadLetterSink` - Destination for permanently failed items

mod analysis_registry;
mod dead_letter_sink;
mod event_publisher;

pub use analysis_registry::{AnalysisRegistry, RegistryError};
pub use dead_letter_sink::{DeadLetter, DeadLetterSink};
pub use event_publisher::EventPublisher;
