//! HTTP surface of the notification service.

use amity_core::http::message;
use amity_core::{Authenticator, Error, Principal};
use axum::extract::{FromRef, Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::Value;
use tracing::{error, instrument};

use crate::storage::{Notification, NotificationDatabase};

/// Shared state of the notification router.
#[derive(Clone)]
pub struct NotifyState {
    pub db: NotificationDatabase,
    pub auth: Authenticator,
}

impl FromRef<NotifyState> for Authenticator {
    fn from_ref(state: &NotifyState) -> Self {
        state.auth.clone()
    }
}

/// Build the `/notifications/*` router.
pub fn build_router(state: NotifyState) -> Router {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/", get(list_notifications))
        .route("/notifications/{notification_id}/read", put(mark_read))
        .with_state(state)
}

/// `GET /notifications/`
#[instrument(skip_all, fields(op = "list_notifications", user_id = principal.user_id))]
pub async fn list_notifications(
    State(state): State<NotifyState>,
    principal: Principal,
) -> Result<Json<Vec<Notification>>, Error> {
    let rows = state.db.list_for(principal.user_id).await.map_err(|e| {
        error!(error = %e, "Listing notifications failed");
        Error::Internal("Failed to fetch notifications".into())
    })?;
    Ok(Json(rows))
}

/// `PUT /notifications/{notification_id}/read`
#[instrument(skip_all, fields(op = "mark_read", user_id = principal.user_id))]
pub async fn mark_read(
    State(state): State<NotifyState>,
    principal: Principal,
    Path(notification_id): Path<String>,
) -> Result<Json<Value>, Error> {
    let id = parse_id(&notification_id)?;

    let updated = state.db.mark_read(id, principal.user_id).await.map_err(|e| {
        error!(error = %e, notification_id = id, "Marking notification failed");
        Error::Internal("Failed to update notification".into())
    })?;
    if !updated {
        return Err(Error::NotFound("Notification not found".into()));
    }

    Ok(message("Notification marked as read"))
}

fn parse_id(raw: &str) -> Result<i64, Error> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| Error::InvalidRequest("Invalid notification id".into()))
}
