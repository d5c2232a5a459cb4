//! Event infrastructure for outbound message publishing.
//!
//! This module provides the core types for handing events to the outbound boundary:
//! - `EventId` - Unique identifier for events (deduplication downstream)
//! - `MessageMetadata` - Tracing and correlation context
//! - `OutboundMessage` - Transport wrapper carrying content type and partition key
//! - `DomainEvent` - Trait that all emitted events implement

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

use super::{DomainError, ErrorCode, Timestamp};

/// Serialization format suffix used in content types.
pub const JSON_ENCODING: &str = "json";

/// Trait that all emitted events must implement.
///
/// Provides what the outbound boundary needs for routing and decoder selection
/// without knowing the concrete event shape.
pub trait DomainEvent: Send + Sync {
    /// Schema name of the event (e.g., "GraphEvent").
    ///
    /// Downstream consumers select their decoder from the content type
    /// derived from this name.
    fn schema_name(&self) -> &'static str;

    /// Returns the unique ID for this event instance.
    fn event_id(&self) -> EventId;

    /// Partition key for the event (the subject it describes).
    fn partition_key(&self) -> String;
}

/// Unique identifier for events.
///
/// Uses a String internally to allow for various ID formats (UUID, ULID, etc.)
/// while maintaining serializability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Creates a new random EventId using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates an EventId from an existing string.
    ///
    /// No validation is performed - any non-empty string is accepted.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlation metadata; `correlation_id` links the emitted event back to the
/// inbound notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

/// Transport envelope for emitted events.
///
/// Wraps the serialized event with what the broker binding needs:
/// - Decoder selection (content_type)
/// - Partitioning (key)
/// - Correlation (metadata)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    /// Unique ID of the wrapped event.
    pub event_id: EventId,

    /// Media type naming the canonical schema, e.g. `application/vnd.GraphEvent+json`.
    pub content_type: String,

    /// Partition key.
    pub key: String,

    /// When the message was produced.
    pub produced_at: Timestamp,

    /// Event payload as JSON.
    pub payload: JsonValue,

    /// Correlation metadata.
    #[serde(default)]
    pub metadata: MessageMetadata,
}

impl OutboundMessage {
    /// Wraps a domain event, serializing it as the payload.
    ///
    /// The content type defaults to `application/vnd.<schema>+json`.
    pub fn from_event<T>(event: &T) -> Result<Self, DomainError>
    where
        T: DomainEvent + Serialize,
    {
        let payload = serde_json::to_value(event).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize {}: {}", event.schema_name(), e),
            )
        })?;

        Ok(Self {
            event_id: event.event_id(),
            content_type: Self::content_type_for(event.schema_name()),
            key: event.partition_key(),
            produced_at: Timestamp::now(),
            payload,
            metadata: MessageMetadata::default(),
        })
    }

    /// Builds the vendor media type for a schema name.
    pub fn content_type_for(schema_name: &str) -> String {
        format!("application/vnd.{}+{}", schema_name, JSON_ENCODING)
    }

    /// Overrides the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Add correlation ID for tracing back to the inbound message.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.metadata.correlation_id = Some(id.into());
        self
    }

    /// Deserialize payload to a specific event type.
    pub fn payload_as<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}
