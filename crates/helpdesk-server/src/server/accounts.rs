//! Registration, login and token refresh.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use helpdesk_core::Error;
use helpdesk_core::db::unix_timestamp;
use helpdesk_core::user::{NewUser, Registration};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use super::error::{ApiResult, JsonBody};
use super::middleware::bearer_token;
use super::state::AppState;
use crate::auth::TokenPair;
use crate::auth::password;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// `POST /signup`
#[instrument(skip_all, fields(email = %registration.email))]
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    JsonBody(registration): JsonBody<Registration>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    registration.validate(state.min_password_len)?;

    let encrypted = password::hash_password(&registration.password)?;
    let api_token = uuid::Uuid::new_v4().simple().to_string();
    let user = state
        .credentials
        .create_user(NewUser::register(
            registration,
            encrypted,
            api_token,
            unix_timestamp(),
        ))
        .await?;

    info!(user_id = user.id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "response": "user created" })),
    ))
}

/// `POST /signin`
///
/// Unknown e-mail, wrong password and inactive identity are indistinguishable
/// to the client.
#[instrument(skip_all, fields(email = %credentials.email))]
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> ApiResult<Json<TokenPair>> {
    let user = match state.credentials.find_user_by_email(&credentials.email).await {
        Ok(user) => user,
        Err(Error::NotFound(_)) => {
            password::verify_dummy(&credentials.password);
            warn!("Login for unknown e-mail");
            return Err(Error::NotAuthenticated.into());
        }
        Err(e) => return Err(e.into()),
    };

    if !user.is_active || !password::verify_password(&credentials.password, &user.encrypted_password)
    {
        warn!(user_id = user.id, "Failed login attempt");
        return Err(Error::NotAuthenticated.into());
    }

    let pair = state.tokens.issue_pair(user.id, user.role)?;
    info!(user_id = user.id, "User logged in");
    Ok(Json(pair))
}

/// `GET /checkAccess`: exchange a refresh token for a new access token.
#[instrument(skip_all)]
pub async fn check_access(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<TokenPair>> {
    let token = bearer_token(&headers)?;
    let pair = state.tokens.refresh(token)?;
    Ok(Json(pair))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
