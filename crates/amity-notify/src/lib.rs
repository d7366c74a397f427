//! Amity notification service.
//!
//! Consumes friendship events from the broker, stores them as
//! notifications and serves them under `/notifications/*`.

pub mod consumer;
pub mod server;
pub mod storage;

pub use consumer::{ConsumerHandle, ConsumerStats, NotificationConsumer};
pub use server::{NotifyState, build_router};
pub use storage::NotificationDatabase;
