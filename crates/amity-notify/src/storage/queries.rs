//! Notification queries.

use amity_core::bus::DomainEvent;
use amity_core::db::unix_timestamp;

use super::DatabaseError;
use super::db::NotificationDatabase;
use super::models::{Notification, STATUS_READ};

impl NotificationDatabase {
    /// Persist a record derived from a consumed event.
    pub async fn insert_notification(
        &self,
        event: &DomainEvent,
    ) -> Result<Notification, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO notifications (sender_id, receiver_id, message, topic, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(event.sender_id)
        .bind(event.receiver_id)
        .bind(&event.message)
        .bind(&event.topic)
        .bind(&event.status)
        .bind(unix_timestamp())
        .execute(self.pool())
        .await?;

        self.get_notification(result.last_insert_rowid()).await
    }

    /// Get a notification by id.
    pub async fn get_notification(&self, id: i64) -> Result<Notification, DatabaseError> {
        sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Notification".into()))
    }

    /// All notifications addressed to `receiver_id`, oldest first.
    pub async fn list_for(&self, receiver_id: i64) -> Result<Vec<Notification>, DatabaseError> {
        let rows = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE receiver_id = ? ORDER BY id",
        )
        .bind(receiver_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    /// Mark notification `id` as read if it is addressed to `receiver_id`.
    ///
    /// Returns `false` if there is no such notification for that receiver.
    pub async fn mark_read(&self, id: i64, receiver_id: i64) -> Result<bool, DatabaseError> {
        let result =
            sqlx::query("UPDATE notifications SET status = ? WHERE id = ? AND receiver_id = ?")
                .bind(STATUS_READ)
                .bind(id)
                .bind(receiver_id)
                .execute(self.pool())
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
