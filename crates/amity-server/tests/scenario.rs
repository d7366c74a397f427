//! End-to-end flows across both services.

#![allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use amity_notify::NotificationDatabase;
use amity_server::{ServerConfig, Services, build_services};
use amity_social::SocialDatabase;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn services() -> Services {
    let config = ServerConfig {
        jwt_secret: "scenario-secret".into(),
        access_ttl: 3600,
        broker_capacity: 64,
    };
    build_services(
        &config,
        SocialDatabase::open_in_memory().await.unwrap(),
        NotificationDatabase::open_in_memory().await.unwrap(),
    )
}

async fn call(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let resp = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn register(router: &Router, username: &str) -> String {
    let (status, _) = call(
        router,
        "POST",
        "/user/auth/signup",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(
        router,
        "POST",
        "/user/auth/login",
        None,
        Some(json!({ "username": username, "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

async fn friend_op(router: &Router, path: &str, token: &str, username: &str) -> StatusCode {
    call(
        router,
        "POST",
        &format!("/user/friend/{path}"),
        Some(token),
        Some(json!({ "username": username })),
    )
    .await
    .0
}

/// Poll the notification API until `token`'s list has `count` entries.
async fn notifications(router: &Router, token: &str, count: usize) -> Vec<Value> {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let (status, body) = call(router, "GET", "/notifications/", Some(token), None).await;
            assert_eq!(status, StatusCode::OK);
            let rows = body.as_array().unwrap().clone();
            if rows.len() >= count {
                return rows;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn friendship_flow_reaches_notifications() {
    let svc = services().await;
    let social = &svc.social_router;
    let alice = register(social, "alice").await;
    let bob = register(social, "bob").await;

    assert_eq!(friend_op(social, "send", &alice, "bob").await, StatusCode::OK);

    let (_, requests) = call(social, "GET", "/user/friend/requests", Some(&bob), None).await;
    assert_eq!(requests.as_array().unwrap().len(), 1);
    assert_eq!(requests[0]["status"], "pending");

    assert_eq!(friend_op(social, "accept", &bob, "alice").await, StatusCode::OK);

    for token in [&alice, &bob] {
        let (_, friends) = call(social, "GET", "/user/friend/list", Some(token), None).await;
        assert_eq!(friends[0]["status"], "accepted");
    }

    // The request notifies bob; the acceptance notifies alice.
    let bob_rows = notifications(&svc.notify_router, &bob, 1).await;
    assert_eq!(bob_rows[0]["topic"], "friend_request");
    assert_eq!(bob_rows[0]["message"], "You have received a new friend request");

    let alice_rows = notifications(&svc.notify_router, &alice, 1).await;
    assert_eq!(alice_rows[0]["topic"], "friend_request_accepted");
    assert_eq!(alice_rows[0]["sender_id"], bob_rows[0]["receiver_id"]);

    let id = bob_rows[0]["id"].as_i64().unwrap();
    let (status, _) = call(
        &svc.notify_router,
        "PUT",
        &format!("/notifications/{id}/read"),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let bob_rows = notifications(&svc.notify_router, &bob, 1).await;
    assert_eq!(bob_rows[0]["status"], "read");

    let stats = svc.consumer.stop().await;
    assert_eq!(stats.processed, 2);
}

#[tokio::test]
async fn logout_revokes_token_for_both_services() {
    let svc = services().await;
    let social = &svc.social_router;
    let alice = register(social, "alice").await;
    register(social, "bob").await;

    let (status, _) = call(social, "POST", "/user/auth/logout", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(
        friend_op(social, "send", &alice, "bob").await,
        StatusCode::UNAUTHORIZED
    );
    let (status, _) = call(&svc.notify_router, "GET", "/notifications/", Some(&alice), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A fresh login is unaffected.
    let again = register_login_only(social, "alice").await;
    assert_eq!(friend_op(social, "send", &again, "bob").await, StatusCode::OK);
}

async fn register_login_only(router: &Router, username: &str) -> String {
    let (status, body) = call(
        router,
        "POST",
        "/user/auth/login",
        None,
        Some(json!({ "username": username, "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn transitions_succeed_without_a_consumer() {
    let Services {
        social_router,
        notify_router,
        broker,
        consumer,
        ..
    } = services().await;
    consumer.stop().await;

    let alice = register(&social_router, "alice").await;
    let bob = register(&social_router, "bob").await;

    // Nothing is subscribed, so both publishes fail; the calls still succeed.
    assert_eq!(friend_op(&social_router, "send", &alice, "bob").await, StatusCode::OK);
    assert_eq!(friend_op(&social_router, "accept", &bob, "alice").await, StatusCode::OK);

    // A consumer started now does not see the lost events.
    let late = amity_notify::NotificationConsumer::start(
        &broker,
        NotificationDatabase::open_in_memory().await.unwrap(),
    );
    let (_, rows) = call(&notify_router, "GET", "/notifications/", Some(&bob), None).await;
    assert!(rows.as_array().unwrap().is_empty());
    assert_eq!(late.stop().await.processed, 0);
}
