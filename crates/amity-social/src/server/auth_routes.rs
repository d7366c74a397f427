//! `/user/auth/*` handlers.

use amity_core::http::{JsonBody, message};
use amity_core::{Error, Principal};
use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use super::SocialState;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /user/auth/signup`
#[instrument(skip_all, fields(op = "signup", username = %req.username))]
pub async fn signup(
    State(state): State<SocialState>,
    JsonBody(req): JsonBody<SignupRequest>,
) -> Result<Json<Value>, Error> {
    state
        .accounts
        .signup(&req.username, &req.email, &req.password)
        .await?;
    Ok(message("User created successfully"))
}

/// `POST /user/auth/login`
#[instrument(skip_all, fields(op = "login", username = %req.username))]
pub async fn login(
    State(state): State<SocialState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<Value>, Error> {
    let token = state.accounts.login(&req.username, &req.password).await?;
    Ok(Json(json!({ "message": "Login successful", "token": token })))
}

/// `POST /user/auth/logout`
#[instrument(skip_all, fields(op = "logout", user_id = principal.user_id))]
pub async fn logout(State(state): State<SocialState>, principal: Principal) -> Json<Value> {
    state.accounts.logout(&principal);
    message("Logged out successfully")
}
