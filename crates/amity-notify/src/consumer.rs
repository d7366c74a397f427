//! # Notification Consumer
//!
//! A long-lived task that turns `friendship_events` broker messages into
//! stored notifications, one message at a time.
//!
//! The subscription is taken when the consumer starts, so a restarted
//! consumer never sees events published while it was down. Messages that
//! fail to decode are logged and skipped; there is no retry and no
//! dead-letter path.

use amity_core::bus::{BrokerSubscription, DomainEvent, FRIENDSHIP_EVENTS_TOPIC, InMemoryBroker};
use amity_core::db::DatabaseError;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::storage::{Notification, NotificationDatabase};

/// Why a single message was not turned into a notification.
#[derive(Debug, Error)]
pub enum ConsumeError {
    #[error("Failed to decode event: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to store notification: {0}")]
    Store(#[from] DatabaseError),
}

/// Counters reported when the consumer stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerStats {
    /// Messages stored as notifications.
    pub processed: u64,
    /// Messages dropped because they did not decode.
    pub skipped: u64,
    /// Messages that decoded but could not be stored.
    pub failed: u64,
}

pub struct NotificationConsumer;

impl NotificationConsumer {
    /// Subscribe to [`FRIENDSHIP_EVENTS_TOPIC`] and start consuming.
    ///
    /// The subscription exists once this returns: any event published
    /// afterwards reaches the consumer.
    pub fn start(broker: &InMemoryBroker, db: NotificationDatabase) -> ConsumerHandle {
        Self::start_with(broker.subscribe(FRIENDSHIP_EVENTS_TOPIC), db)
    }

    /// Start consuming from an existing subscription.
    pub fn start_with(
        subscription: BrokerSubscription,
        db: NotificationDatabase,
    ) -> ConsumerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run(subscription, db, shutdown_rx));
        ConsumerHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Controls a running consumer. Dropping the handle also stops it.
pub struct ConsumerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<ConsumerStats>,
}

impl ConsumerHandle {
    /// Signal shutdown and wait for the loop to exit.
    ///
    /// A message already being processed is finished first.
    pub async fn stop(self) -> ConsumerStats {
        let _ = self.shutdown.send(true);
        match self.task.await {
            Ok(stats) => stats,
            Err(e) => {
                error!(error = %e, "Notification consumer task failed");
                ConsumerStats::default()
            }
        }
    }

    /// Whether the loop has already exited (for example because the broker
    /// went away).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

async fn run(
    mut subscription: BrokerSubscription,
    db: NotificationDatabase,
    mut shutdown: watch::Receiver<bool>,
) -> ConsumerStats {
    info!(topic = %subscription.topic(), "Notification consumer started");
    let mut stats = ConsumerStats::default();

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            payload = subscription.recv() => {
                let Some(payload) = payload else {
                    info!("Broker closed, notification consumer exiting");
                    break;
                };
                match handle_message(&db, &payload).await {
                    Ok(notification) => {
                        stats.processed += 1;
                        debug!(
                            id = notification.id,
                            receiver_id = notification.receiver_id,
                            topic = %notification.topic,
                            "Notification stored"
                        );
                    }
                    Err(ConsumeError::Decode(e)) => {
                        stats.skipped += 1;
                        warn!(error = %e, "Skipping undecodable event");
                    }
                    Err(ConsumeError::Store(e)) => {
                        stats.failed += 1;
                        error!(error = %e, "Failed to store notification");
                    }
                }
            }
        }
    }

    info!(
        processed = stats.processed,
        skipped = stats.skipped,
        failed = stats.failed,
        "Notification consumer stopped"
    );
    stats
}

/// Decode one broker payload and persist it.
pub async fn handle_message(
    db: &NotificationDatabase,
    payload: &[u8],
) -> Result<Notification, ConsumeError> {
    let event = DomainEvent::from_bytes(payload)?;
    Ok(db.insert_notification(&event).await?)
}
