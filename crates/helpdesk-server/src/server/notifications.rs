//! Notification listing, acknowledgment and creation.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use helpdesk_core::Notification;
use helpdesk_core::notification::NotificationDraft;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use super::error::{ApiResult, JsonBody};
use super::state::AppState;
use crate::auth::RequestIdentity;

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub indexes: Vec<i64>,
}

/// `GET /api/v1/notif/update`: the caller's unread notifications.
#[instrument(skip(state))]
pub async fn unread(
    State(state): State<Arc<AppState>>,
    identity: RequestIdentity,
) -> ApiResult<Json<Vec<Notification>>> {
    Ok(Json(state.notifications.find_unread_for(identity.id).await?))
}

/// `POST /api/v1/notif/check`
#[instrument(skip(state, body))]
pub async fn check(
    State(state): State<Arc<AppState>>,
    identity: RequestIdentity,
    JsonBody(body): JsonBody<CheckRequest>,
) -> ApiResult<Json<Value>> {
    state
        .notifications
        .check(&body.indexes, identity.id)
        .await?;
    Ok(Json(json!({ "message": "notifications updated" })))
}

/// `POST /api/v1/notif/create`, admin only.
#[instrument(skip(state, draft))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    identity: RequestIdentity,
    JsonBody(draft): JsonBody<NotificationDraft>,
) -> ApiResult<Json<Notification>> {
    identity.require_admin()?;
    Ok(Json(state.notifications.create(draft).await?))
}
