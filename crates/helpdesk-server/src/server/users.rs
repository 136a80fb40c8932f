//! Identity lookup and update.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use helpdesk_core::{User, UserPatch};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::error::{ApiResult, JsonBody, QueryParams};
use super::state::AppState;
use crate::auth::{RequestIdentity, password};

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

/// `GET /api/v1/user?id=N`, admin only.
#[instrument(skip(state))]
pub async fn find_user(
    State(state): State<Arc<AppState>>,
    identity: RequestIdentity,
    QueryParams(query): QueryParams<IdQuery>,
) -> ApiResult<Json<User>> {
    identity.require_admin()?;
    let user = state.credentials.find_user(query.id).await?;
    Ok(Json(user))
}

/// `GET /api/v1/me`
#[instrument(skip(state))]
pub async fn me(
    State(state): State<Arc<AppState>>,
    identity: RequestIdentity,
) -> ApiResult<Json<User>> {
    let user = state.credentials.find_user(identity.id).await?;
    Ok(Json(user))
}

/// `POST /api/v1/updateUser`
#[instrument(skip(state, patch))]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    identity: RequestIdentity,
    JsonBody(patch): JsonBody<UserPatch>,
) -> ApiResult<Json<Value>> {
    let target = patch.authorize(identity.id, identity.role)?;
    let mut user = state.credentials.find_user(target).await?;
    patch.apply_to(&mut user, state.min_password_len, password::hash_password)?;
    state.credentials.update_user(&user).await?;

    info!(user_id = user.id, by = identity.id, "User updated");
    Ok(Json(json!({ "message": "updated" })))
}
