//! # Friendship State Machine
//!
//! ```text
//!            send            accept             unfollow
//!   (none) ───────► pending ───────► accepted ◄──────────► unfollowed
//!      ▲                                        follow-again     │
//!      └──────────────────── unfriend (any status) ──────────────┘
//! ```
//!
//! Each transition is one conditional write, so its check and its effect
//! can never be split by a concurrent request. Events are published only
//! after the write has landed; a failed publish is logged and the
//! transition still stands.

use std::sync::Arc;

use amity_core::bus::{DomainEvent, EventPublisher};
use amity_core::{Error, Result};
use tracing::{info, warn};

use crate::storage::{Friendship, FriendshipStatus, SocialDatabase, User};


pub struct FriendshipService {
    db: SocialDatabase,
    publisher: Arc<dyn EventPublisher>,
}

impl FriendshipService {
    pub fn new(db: SocialDatabase, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { db, publisher }
    }

    async fn resolve(&self, username: &str) -> Result<User> {
        Ok(self.db.get_user_by_username(username).await?)
    }

    fn publish(&self, event: &DomainEvent) {
        if let Err(e) = self.publisher.publish(event) {
            warn!(
                error = %e,
                topic = %event.topic,
                sender_id = event.sender_id,
                receiver_id = event.receiver_id,
                "Failed to publish event"
            );
        }
    }

    /// Create a pending edge from `requester_id` to `target`.
    pub async fn send_request(&self, requester_id: i64, target: &str) -> Result<()> {
        let target = self.resolve(target).await?;
        if target.id == requester_id {
            return Err(Error::InvalidRequest(
                "Cannot send a friend request to yourself".into(),
            ));
        }

        if !self.db.create_friend_request(requester_id, target.id).await? {
            return Err(Error::Conflict("Friend request already exists".into()));
        }

        info!(requester_id, addressee_id = target.id, "Friend request sent");
        self.publish(&DomainEvent::friend_request(requester_id, target.id));
        Ok(())
    }

    /// Accept the pending request `requester` sent to `accepter_id`.
    pub async fn accept_request(&self, accepter_id: i64, requester: &str) -> Result<()> {
        let requester = self.resolve(requester).await?;

        if !self
            .db
            .accept_friend_request(requester.id, accepter_id)
            .await?
        {
            return Err(Error::PreconditionFailed(
                "No pending friend request found".into(),
            ));
        }

        info!(requester_id = requester.id, accepter_id, "Friend request accepted");
        self.publish(&DomainEvent::friend_request_accepted(accepter_id, requester.id));
        Ok(())
    }

    /// Pending requests waiting on `user_id`.
    pub async fn view_requests(&self, user_id: i64) -> Result<Vec<Friendship>> {
        Ok(self.db.pending_requests_for(user_id).await?)
    }

    /// Accepted and unfollowed edges involving `user_id`.
    pub async fn view_friends(&self, user_id: i64) -> Result<Vec<Friendship>> {
        Ok(self.db.friends_of(user_id).await?)
    }

    pub async fn unfollow(&self, user_id: i64, target: &str) -> Result<()> {
        let target = self.resolve(target).await?;
        if !self
            .db
            .transition_friendship(
                user_id,
                target.id,
                FriendshipStatus::Accepted,
                FriendshipStatus::Unfollowed,
            )
            .await?
        {
            return Err(Error::PreconditionFailed(
                "No accepted friendship found".into(),
            ));
        }

        info!(user_id, target_id = target.id, "User unfollowed");
        Ok(())
    }

    pub async fn follow_again(&self, user_id: i64, target: &str) -> Result<()> {
        let target = self.resolve(target).await?;
        if !self
            .db
            .transition_friendship(
                user_id,
                target.id,
                FriendshipStatus::Unfollowed,
                FriendshipStatus::Accepted,
            )
            .await?
        {
            return Err(Error::PreconditionFailed(
                "No unfollowed friendship found".into(),
            ));
        }

        info!(user_id, target_id = target.id, "User followed again");
        Ok(())
    }

    /// Remove any edge with `target`. Succeeds even if there was none.
    pub async fn unfriend(&self, user_id: i64, target: &str) -> Result<()> {
        let target = self.resolve(target).await?;
        let removed = self.db.delete_friendship(user_id, target.id).await?;

        info!(user_id, target_id = target.id, removed, "User unfriended");
        Ok(())
    }
}
