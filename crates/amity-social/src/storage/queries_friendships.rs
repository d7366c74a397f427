//! Friendship edge queries.
//!
//! Pair lookups go through `MIN`/`MAX` of the two ids so that both
//! directions of an edge match one grouped predicate.

use amity_core::db::unix_timestamp;

use super::DatabaseError;
use super::db::SocialDatabase;
use super::models::{Friendship, FriendshipStatus};

impl SocialDatabase {
    /// Insert a pending edge `requester -> addressee`.
    ///
    /// Returns `false` if any edge already exists for the pair, in either
    /// direction and with any status.
    pub async fn create_friend_request(
        &self,
        requester_id: i64,
        addressee_id: i64,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO friendships (requester_id, addressee_id, status, created_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT DO NOTHING",
        )
        .bind(requester_id)
        .bind(addressee_id)
        .bind(FriendshipStatus::Pending)
        .bind(unix_timestamp())
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flip the pending edge `requester -> addressee` to accepted.
    ///
    /// Returns `false` if there is no such pending edge.
    pub async fn accept_friend_request(
        &self,
        requester_id: i64,
        addressee_id: i64,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE friendships SET status = ?
             WHERE requester_id = ? AND addressee_id = ? AND status = ?",
        )
        .bind(FriendshipStatus::Accepted)
        .bind(requester_id)
        .bind(addressee_id)
        .bind(FriendshipStatus::Pending)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Move the edge between `a` and `b` from `from` to `to`.
    ///
    /// Direction does not matter. Returns `false` if no edge for the pair
    /// currently has status `from`.
    pub async fn transition_friendship(
        &self,
        a: i64,
        b: i64,
        from: FriendshipStatus,
        to: FriendshipStatus,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE friendships SET status = ?
             WHERE (MIN(requester_id, addressee_id) = ? AND MAX(requester_id, addressee_id) = ?)
               AND status = ?",
        )
        .bind(to)
        .bind(a.min(b))
        .bind(a.max(b))
        .bind(from)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove the edge between `a` and `b`, whatever its status.
    ///
    /// Returns `false` if there was nothing to remove.
    pub async fn delete_friendship(&self, a: i64, b: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "DELETE FROM friendships
             WHERE MIN(requester_id, addressee_id) = ? AND MAX(requester_id, addressee_id) = ?",
        )
        .bind(a.min(b))
        .bind(a.max(b))
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// The edge between `a` and `b`, if any.
    pub async fn get_friendship(
        &self,
        a: i64,
        b: i64,
    ) -> Result<Option<Friendship>, DatabaseError> {
        let edge = sqlx::query_as::<_, Friendship>(
            "SELECT * FROM friendships
             WHERE MIN(requester_id, addressee_id) = ? AND MAX(requester_id, addressee_id) = ?",
        )
        .bind(a.min(b))
        .bind(a.max(b))
        .fetch_optional(self.pool())
        .await?;

        Ok(edge)
    }

    /// Pending requests addressed to `user_id`.
    pub async fn pending_requests_for(
        &self,
        user_id: i64,
    ) -> Result<Vec<Friendship>, DatabaseError> {
        let edges = sqlx::query_as::<_, Friendship>(
            "SELECT * FROM friendships
             WHERE addressee_id = ? AND status = ?
             ORDER BY created_at, rowid",
        )
        .bind(user_id)
        .bind(FriendshipStatus::Pending)
        .fetch_all(self.pool())
        .await?;

        Ok(edges)
    }

    /// Established edges (accepted or unfollowed) involving `user_id`.
    pub async fn friends_of(&self, user_id: i64) -> Result<Vec<Friendship>, DatabaseError> {
        let edges = sqlx::query_as::<_, Friendship>(
            "SELECT * FROM friendships
             WHERE (requester_id = ? OR addressee_id = ?)
               AND status IN (?, ?)
             ORDER BY created_at, rowid",
        )
        .bind(user_id)
        .bind(user_id)
        .bind(FriendshipStatus::Accepted)
        .bind(FriendshipStatus::Unfollowed)
        .fetch_all(self.pool())
        .await?;

        Ok(edges)
    }
}
