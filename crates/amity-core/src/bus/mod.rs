//! # Event Bus
//!
//! Carries relationship-state notifications from the social service to the
//! notification service. Delivery is best-effort: the broker is a one-way,
//! in-process fan-out with no acknowledgements, no retries and no replay.
//!
//! ```text
//! FriendshipService ──publish──► BrokerPublisher ──send──► InMemoryBroker
//!                                                       │ "friendship_events"
//!                                                       ▼
//!                                             BrokerSubscription ──► consumer
//! ```

pub mod broker;
pub mod event;
pub mod publisher;

pub use broker::{BrokerError, BrokerSubscription, DEFAULT_TOPIC_CAPACITY, InMemoryBroker};
pub use event::{DomainEvent, FRIENDSHIP_EVENTS_TOPIC};
pub use publisher::{BrokerPublisher, EventPublisher, PublishError};
