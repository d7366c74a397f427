//! Event publishing seam between the social service and the broker.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::broker::{BrokerError, InMemoryBroker};
use super::event::{DomainEvent, FRIENDSHIP_EVENTS_TOPIC};

/// Errors from publishing an event.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Failed to encode event: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Broker(#[from] BrokerError),
}

/// Emits domain events.
///
/// Implementations must not block; callers treat failures as non-fatal.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: &DomainEvent) -> Result<(), PublishError>;
}

/// Publishes JSON-encoded events to one broker topic.
pub struct BrokerPublisher {
    broker: Arc<InMemoryBroker>,
    topic: String,
}

impl BrokerPublisher {
    /// Publisher for [`FRIENDSHIP_EVENTS_TOPIC`].
    pub fn new(broker: Arc<InMemoryBroker>) -> Self {
        Self::with_topic(broker, FRIENDSHIP_EVENTS_TOPIC)
    }

    pub fn with_topic(broker: Arc<InMemoryBroker>, topic: impl Into<String>) -> Self {
        Self {
            broker,
            topic: topic.into(),
        }
    }
}

impl EventPublisher for BrokerPublisher {
    fn publish(&self, event: &DomainEvent) -> Result<(), PublishError> {
        let payload = event.to_bytes()?;
        let receivers = self.broker.send(&self.topic, payload)?;
        debug!(
            topic = %event.topic,
            sender_id = event.sender_id,
            receiver_id = event.receiver_id,
            receivers,
            "Event published"
        );
        Ok(())
    }
}
