//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the pipeline to external systems:
//! - `registry` - GraphQL analysis registry client
//! - `stream` - JSON-lines inbound source and outbound publisher
//! - `events` - In-memory publisher and dead-letter sinks

pub mod events;
pub mod registry;
pub mod stream;

pub use events::{InMemoryDeadLetterSink, InMemoryEventPublisher, LoggingDeadLetterSink};
pub use registry::{AnalysisDto, RdpcClient, RdpcConfig};
pub use stream::{decode_line, decode_payload, DecodeError, JsonLinesPublisher, JsonLinesSource};
