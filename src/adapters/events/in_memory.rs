//! In-memory publisher for testing.
//!
//! Captures outbound messages so tests can assert on emitted graph events.
//!
//! # Security Note
//!
//! This adapter is for **testing only** and should not be used in production.
//! It uses `.expect()` on lock operations which will panic if locks are poisoned.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, OutboundMessage};
use crate::ports::EventPublisher;

/// In-memory publisher for testing.
///
/// # Panics
///
/// Methods may panic if internal locks are poisoned.
///
/// # Example
///
/// ```ignore
/// let publisher = Arc::new(InMemoryEventPublisher::new());
/// pipeline.process(payload).await;
///
/// assert_eq!(publisher.message_count(), 1);
/// let events: Vec<GraphEvent> = publisher.payloads();
/// ```
pub struct InMemoryEventPublisher {
    published: RwLock<Vec<OutboundMessage>>,
    reject: AtomicBool,
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self {
            published: RwLock::new(Vec::new()),
            reject: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent publish fail (or succeed again).
    pub fn set_rejecting(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }

    // === Test Helpers ===

    /// Returns all published messages.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn published_messages(&self) -> Vec<OutboundMessage> {
        self.published
            .read()
            .expect("InMemoryEventPublisher: published lock poisoned")
            .clone()
    }

    /// Deserializes every captured payload.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned or a payload does not match `T`.
    pub fn payloads<T: DeserializeOwned>(&self) -> Vec<T> {
        self.published_messages()
            .iter()
            .map(|m| {
                m.payload_as()
                    .expect("InMemoryEventPublisher: payload does not match requested type")
            })
            .collect()
    }

    /// Returns messages whose partition key matches.
    pub fn messages_for_key(&self, key: &str) -> Vec<OutboundMessage> {
        self.published_messages()
            .into_iter()
            .filter(|m| m.key == key)
            .collect()
    }

    /// Returns count of published messages.
    pub fn message_count(&self) -> usize {
        self.published
            .read()
            .expect("InMemoryEventPublisher: published lock poisoned")
            .len()
    }

    /// Clears all published messages (for test isolation).
    pub fn clear(&self) {
        self.published
            .write()
            .expect("InMemoryEventPublisher: published write lock poisoned")
            .clear();
    }
}

impl Default for InMemoryEventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, message: OutboundMessage) -> Result<(), DomainError> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::PublishFailed,
                "InMemoryEventPublisher is rejecting messages",
            )
            .with_detail("event_id", message.event_id.to_string()));
        }

        self.published
            .write()
            .expect("InMemoryEventPublisher: published write lock poisoned")
            .push(message);
        Ok(())
    }
}
