//! # In-Memory Broker
//!
//! Topic-keyed `tokio::sync::broadcast` channels. A subscription starts at
//! the newest position: it never sees messages sent before it existed.

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Default number of messages buffered per topic.
pub const DEFAULT_TOPIC_CAPACITY: usize = 1024;

/// Errors from broker operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BrokerError {
    /// Nothing is subscribed to the topic; the message was dropped.
    #[error("No subscribers on topic {0}")]
    NoSubscribers(String),
}

type Payload = Arc<[u8]>;

/// In-process message broker.
pub struct InMemoryBroker {
    topics: DashMap<String, broadcast::Sender<Payload>>,
    capacity: usize,
}

impl InMemoryBroker {
    /// Create a broker with [`DEFAULT_TOPIC_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_TOPIC_CAPACITY)
    }

    /// Create a broker buffering up to `capacity` messages per topic.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            topics: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    fn sender(&self, topic: &str) -> broadcast::Sender<Payload> {
        if let Some(sender) = self.topics.get(topic) {
            return sender.clone();
        }
        self.topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }

    /// Send `payload` to every current subscriber of `topic`.
    ///
    /// Returns the number of subscribers the message was handed to.
    pub fn send(&self, topic: &str, payload: Vec<u8>) -> Result<usize, BrokerError> {
        match self.sender(topic).send(Payload::from(payload)) {
            Ok(receivers) => {
                debug!(topic, receivers, "Message sent");
                Ok(receivers)
            }
            Err(_) => {
                warn!(topic, "Message dropped (no subscribers)");
                Err(BrokerError::NoSubscribers(topic.to_string()))
            }
        }
    }

    /// Subscribe to `topic` from the newest position onwards.
    pub fn subscribe(&self, topic: &str) -> BrokerSubscription {
        let receiver = self.sender(topic).subscribe();
        debug!(topic, "New subscription created");
        BrokerSubscription {
            topic: topic.to_string(),
            receiver,
        }
    }

    /// Number of live subscriptions on `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics
            .get(topic)
            .map_or(0, |sender| sender.receiver_count())
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryBroker {
    fn default() -> Self {
        Self::new()
    }
}

/// A live subscription to one topic.
pub struct BrokerSubscription {
    topic: String,
    receiver: broadcast::Receiver<Payload>,
}

impl BrokerSubscription {
    /// Receive the next message.
    ///
    /// Returns `None` once the broker has been dropped. A subscriber that
    /// falls more than the topic capacity behind skips the overwritten
    /// messages. Cancel safe.
    pub async fn recv(&mut self) -> Option<Payload> {
        loop {
            match self.receiver.recv().await {
                Ok(payload) => return Some(payload),
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(topic = %self.topic, skipped, "Subscriber lagged, messages dropped");
                }
            }
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}
