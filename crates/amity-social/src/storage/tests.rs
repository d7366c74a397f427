//! Storage layer tests for the relationship service.

#![allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]

use super::DatabaseError;
use super::db::SocialDatabase;
use super::models::{FriendshipStatus, User};

async fn test_db() -> SocialDatabase {
    SocialDatabase::open_in_memory().await.unwrap()
}

async fn user(db: &SocialDatabase, name: &str) -> User {
    db.create_user(name, &format!("{name}@example.com"), "hash")
        .await
        .unwrap()
        .unwrap()
}

// === User tests ===

#[tokio::test]
async fn create_and_get_user() {
    let db = test_db().await;
    let alice = user(&db, "alice").await;

    assert_eq!(alice.username, "alice");
    assert_eq!(alice.email, "alice@example.com");
    assert!(alice.last_login.is_none());

    let by_name = db.get_user_by_username("alice").await.unwrap();
    assert_eq!(by_name.id, alice.id);
}

#[tokio::test]
async fn duplicate_username_or_email_is_refused() {
    let db = test_db().await;
    user(&db, "alice").await;

    let same_name = db
        .create_user("alice", "other@example.com", "hash")
        .await
        .unwrap();
    assert!(same_name.is_none());

    let same_email = db
        .create_user("alicia", "alice@example.com", "hash")
        .await
        .unwrap();
    assert!(same_email.is_none());
}

#[tokio::test]
async fn unknown_username_is_not_found() {
    let db = test_db().await;
    let err = db.get_user_by_username("nobody").await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)));
}

#[tokio::test]
async fn touch_last_login_sets_timestamp() {
    let db = test_db().await;
    let alice = user(&db, "alice").await;

    db.touch_last_login(alice.id).await.unwrap();
    assert!(db.get_user(alice.id).await.unwrap().last_login.is_some());
}

#[tokio::test]
async fn password_hash_is_never_serialized() {
    let db = test_db().await;
    let alice = user(&db, "alice").await;

    let value = serde_json::to_value(&alice).unwrap();
    assert!(value.get("password_hash").is_none());
}

// === Friendship tests ===

#[tokio::test]
async fn one_edge_per_unordered_pair() {
    let db = test_db().await;
    let a = user(&db, "alice").await.id;
    let b = user(&db, "bob").await.id;

    assert!(db.create_friend_request(a, b).await.unwrap());
    assert!(!db.create_friend_request(a, b).await.unwrap());
    assert!(!db.create_friend_request(b, a).await.unwrap());
}

#[tokio::test]
async fn accept_requires_pending_edge_in_request_direction() {
    let db = test_db().await;
    let a = user(&db, "alice").await.id;
    let b = user(&db, "bob").await.id;
    db.create_friend_request(a, b).await.unwrap();

    assert!(!db.accept_friend_request(b, a).await.unwrap());
    assert!(db.accept_friend_request(a, b).await.unwrap());
    assert!(!db.accept_friend_request(a, b).await.unwrap());

    let edge = db.get_friendship(b, a).await.unwrap().unwrap();
    assert_eq!(edge.status, FriendshipStatus::Accepted);
    assert_eq!(edge.requester_id, a);
}

#[tokio::test]
async fn transition_matches_exact_status_in_either_direction() {
    let db = test_db().await;
    let a = user(&db, "alice").await.id;
    let b = user(&db, "bob").await.id;
    db.create_friend_request(a, b).await.unwrap();

    // Still pending: nothing to unfollow.
    assert!(
        !db.transition_friendship(b, a, FriendshipStatus::Accepted, FriendshipStatus::Unfollowed)
            .await
            .unwrap()
    );

    db.accept_friend_request(a, b).await.unwrap();
    assert!(
        db.transition_friendship(b, a, FriendshipStatus::Accepted, FriendshipStatus::Unfollowed)
            .await
            .unwrap()
    );
    assert!(
        db.transition_friendship(a, b, FriendshipStatus::Unfollowed, FriendshipStatus::Accepted)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn transition_leaves_unrelated_edges_alone() {
    let db = test_db().await;
    let a = user(&db, "alice").await.id;
    let b = user(&db, "bob").await.id;
    let c = user(&db, "carol").await.id;

    db.create_friend_request(a, b).await.unwrap();
    db.accept_friend_request(a, b).await.unwrap();
    db.create_friend_request(a, c).await.unwrap();
    db.accept_friend_request(a, c).await.unwrap();

    db.transition_friendship(a, b, FriendshipStatus::Accepted, FriendshipStatus::Unfollowed)
        .await
        .unwrap();

    let untouched = db.get_friendship(a, c).await.unwrap().unwrap();
    assert_eq!(untouched.status, FriendshipStatus::Accepted);
}

#[tokio::test]
async fn delete_removes_edge_regardless_of_status() {
    let db = test_db().await;
    let a = user(&db, "alice").await.id;
    let b = user(&db, "bob").await.id;

    db.create_friend_request(a, b).await.unwrap();
    assert!(db.delete_friendship(b, a).await.unwrap());
    assert!(db.get_friendship(a, b).await.unwrap().is_none());
    assert!(!db.delete_friendship(a, b).await.unwrap());

    assert!(db.create_friend_request(b, a).await.unwrap());
}

#[tokio::test]
async fn listing_queries_filter_by_status_and_side() {
    let db = test_db().await;
    let a = user(&db, "alice").await.id;
    let b = user(&db, "bob").await.id;
    let c = user(&db, "carol").await.id;
    let d = user(&db, "dave").await.id;

    db.create_friend_request(a, b).await.unwrap();
    db.create_friend_request(c, a).await.unwrap();
    db.accept_friend_request(c, a).await.unwrap();
    db.create_friend_request(d, a).await.unwrap();
    db.accept_friend_request(d, a).await.unwrap();
    db.transition_friendship(a, d, FriendshipStatus::Accepted, FriendshipStatus::Unfollowed)
        .await
        .unwrap();

    // alice sent to bob, so only bob sees it as a request.
    assert!(db.pending_requests_for(a).await.unwrap().is_empty());
    assert_eq!(db.pending_requests_for(b).await.unwrap().len(), 1);

    let friends: Vec<i64> = db
        .friends_of(a)
        .await
        .unwrap()
        .iter()
        .map(|f| f.other(a))
        .collect();
    assert_eq!(friends, vec![c, d]);
}

#[tokio::test]
async fn self_edge_is_rejected_by_schema() {
    let db = test_db().await;
    let a = user(&db, "alice").await.id;
    assert!(db.create_friend_request(a, a).await.is_err());
}
