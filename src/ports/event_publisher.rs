//! EventPublisher port - Interface for the outbound boundary.
//!
//! This port defines how the pipeline hands canonical events to the outside
//! world without knowing about the underlying transport (broker binding,
//! stdout, in-memory capture).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OutboundMessage};

/// Port for publishing outbound messages.
///
/// Implementations must ensure:
/// - Delivery is at-least-once or better (consumers may see duplicates)
/// - Errors are propagated to the caller
///
/// # Example
///
/// ```ignore
/// let message = OutboundMessage::from_event(&graph_event)?
///     .with_correlation_id(analysis_id.to_string());
/// publisher.publish(message).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single message.
    async fn publish(&self, message: OutboundMessage) -> Result<(), DomainError>;
}
