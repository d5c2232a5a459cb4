//! Event delivery adapters.
//!
//! - `InMemoryEventPublisher` - Captures outbound messages for testing
//! - `LoggingDeadLetterSink` - Default dead-letter destination
//! - `InMemoryDeadLetterSink` - Captures dead letters for testing

mod dead_letter;
mod in_memory;

pub use dead_letter::{InMemoryDeadLetterSink, LoggingDeadLetterSink};
pub use in_memory::InMemoryEventPublisher;
