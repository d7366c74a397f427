//! Data models for notification storage.

use serde::Serialize;

/// Status of a notification the receiver has seen.
pub const STATUS_READ: &str = "read";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Notification {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub message: String,
    pub topic: String,
    pub status: String,
    pub created_at: i64,
}
