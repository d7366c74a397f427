//! Wire representation of a relationship-state change.

use serde::{Deserialize, Serialize};

/// The single broker topic every friendship event is published to.
pub const FRIENDSHIP_EVENTS_TOPIC: &str = "friendship_events";

/// Topic label of a new friend request.
pub const TOPIC_FRIEND_REQUEST: &str = "friend_request";
/// Topic label of an accepted friend request.
pub const TOPIC_FRIEND_REQUEST_ACCEPTED: &str = "friend_request_accepted";
/// Delivery status every event starts with.
pub const STATUS_UNREAD: &str = "unread";

/// A domain event as it travels over the broker.
///
/// Field names are part of the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEvent {
    pub sender_id: i64,
    pub receiver_id: i64,
    pub message: String,
    pub topic: String,
    pub status: String,
}

impl DomainEvent {
    /// `requester` asked `target` to be friends.
    pub fn friend_request(requester: i64, target: i64) -> Self {
        Self {
            sender_id: requester,
            receiver_id: target,
            message: "You have received a new friend request".into(),
            topic: TOPIC_FRIEND_REQUEST.into(),
            status: STATUS_UNREAD.into(),
        }
    }

    /// `accepter` accepted the request `requester` sent earlier.
    pub fn friend_request_accepted(accepter: i64, requester: i64) -> Self {
        Self {
            sender_id: accepter,
            receiver_id: requester,
            message: "Your friend request has been accepted".into(),
            topic: TOPIC_FRIEND_REQUEST_ACCEPTED.into(),
            status: STATUS_UNREAD.into(),
        }
    }

    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(payload: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(payload)
    }
}
