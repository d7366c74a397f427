//! `/user/friend/*` handlers.
//!
//! Every route takes the caller from the bearer token; mutations name the
//! other party by username.

use amity_core::http::{JsonBody, message};
use amity_core::{Error, Principal};
use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use super::SocialState;
use crate::storage::Friendship;

#[derive(Deserialize)]
pub struct TargetRequest {
    pub username: String,
}

/// `POST /user/friend/send`
#[instrument(skip_all, fields(op = "send_request", user_id = principal.user_id))]
pub async fn send_request(
    State(state): State<SocialState>,
    principal: Principal,
    JsonBody(req): JsonBody<TargetRequest>,
) -> Result<Json<Value>, Error> {
    state
        .friendships
        .send_request(principal.user_id, &req.username)
        .await?;
    Ok(message("Friend request sent"))
}

/// `GET /user/friend/requests`
#[instrument(skip_all, fields(op = "view_requests", user_id = principal.user_id))]
pub async fn view_requests(
    State(state): State<SocialState>,
    principal: Principal,
) -> Result<Json<Vec<Friendship>>, Error> {
    Ok(Json(state.friendships.view_requests(principal.user_id).await?))
}

/// `POST /user/friend/accept`
#[instrument(skip_all, fields(op = "accept_request", user_id = principal.user_id))]
pub async fn accept_request(
    State(state): State<SocialState>,
    principal: Principal,
    JsonBody(req): JsonBody<TargetRequest>,
) -> Result<Json<Value>, Error> {
    state
        .friendships
        .accept_request(principal.user_id, &req.username)
        .await?;
    Ok(message("Friend request accepted"))
}

/// `GET /user/friend/list`
#[instrument(skip_all, fields(op = "view_friends", user_id = principal.user_id))]
pub async fn view_friends(
    State(state): State<SocialState>,
    principal: Principal,
) -> Result<Json<Vec<Friendship>>, Error> {
    Ok(Json(state.friendships.view_friends(principal.user_id).await?))
}

/// `POST /user/friend/unfriend`
#[instrument(skip_all, fields(op = "unfriend", user_id = principal.user_id))]
pub async fn unfriend(
    State(state): State<SocialState>,
    principal: Principal,
    JsonBody(req): JsonBody<TargetRequest>,
) -> Result<Json<Value>, Error> {
    state
        .friendships
        .unfriend(principal.user_id, &req.username)
        .await?;
    Ok(message("User unfriended"))
}

/// `POST /user/friend/unfollow`
#[instrument(skip_all, fields(op = "unfollow", user_id = principal.user_id))]
pub async fn unfollow(
    State(state): State<SocialState>,
    principal: Principal,
    JsonBody(req): JsonBody<TargetRequest>,
) -> Result<Json<Value>, Error> {
    state
        .friendships
        .unfollow(principal.user_id, &req.username)
        .await?;
    Ok(message("User unfollowed"))
}

/// `POST /user/friend/follow-again`
#[instrument(skip_all, fields(op = "follow_again", user_id = principal.user_id))]
pub async fn follow_again(
    State(state): State<SocialState>,
    principal: Principal,
    JsonBody(req): JsonBody<TargetRequest>,
) -> Result<Json<Value>, Error> {
    state
        .friendships
        .follow_again(principal.user_id, &req.username)
        .await?;
    Ok(message("User followed again"))
}
