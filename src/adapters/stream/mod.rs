//! Inbound and outbound channel adapters.

mod json_lines;

pub use json_lines::{decode_line, decode_payload, DecodeError, JsonLinesPublisher, JsonLinesSource};
