//! HTTP surface of the relationship service.

mod auth_routes;
mod friend_routes;

use std::sync::Arc;

use amity_core::Authenticator;
use axum::Router;
use axum::extract::FromRef;
use axum::routing::{get, post};

use crate::auth::AccountService;
use crate::friendship::FriendshipService;

/// Shared state of the relationship router.
#[derive(Clone)]
pub struct SocialState {
    pub accounts: Arc<AccountService>,
    pub friendships: Arc<FriendshipService>,
    pub auth: Authenticator,
}

impl FromRef<SocialState> for Authenticator {
    fn from_ref(state: &SocialState) -> Self {
        state.auth.clone()
    }
}

/// Build the `/user/auth/*` and `/user/friend/*` router.
pub fn build_router(state: SocialState) -> Router {
    let auth = Router::new()
        .route("/signup", post(auth_routes::signup))
        .route("/login", post(auth_routes::login))
        .route("/logout", post(auth_routes::logout));

    let friend = Router::new()
        .route("/send", post(friend_routes::send_request))
        .route("/requests", get(friend_routes::view_requests))
        .route("/accept", post(friend_routes::accept_request))
        .route("/list", get(friend_routes::view_friends))
        .route("/unfriend", post(friend_routes::unfriend))
        .route("/unfollow", post(friend_routes::unfollow))
        .route("/follow-again", post(friend_routes::follow_again));

    Router::new()
        .nest("/user/auth", auth)
        .nest("/user/friend", friend)
        .with_state(state)
}
