//! Access gate and request deadline.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use helpdesk_core::{Error, Result};

use super::error::ApiError;
use super::state::AppState;
use crate::auth::RequestIdentity;

/// Header carrying `<scheme> <token>`.
pub const AUTH_HEADER: &str = "authentication";

/// Extract the token from the auth header. The value must be exactly two
/// space-separated parts with a non-empty token; the scheme is not checked.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    let value = headers
        .get(AUTH_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(Error::NotAuthenticated)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_scheme), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(Error::NotAuthenticated),
    }
}

/// Reject anything but a valid access token and bind the caller identity.
pub async fn access_gate(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> std::result::Result<Response, ApiError> {
    let claims = {
        let token = bearer_token(request.headers())?;
        state.tokens.authenticate_access(token)?
    };
    request
        .extensions_mut()
        .insert(RequestIdentity::from(&claims));
    Ok(next.run(request).await)
}

/// Bound the whole request, repository calls included. The handler future is
/// dropped when the deadline passes.
pub async fn deadline(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> std::result::Result<Response, ApiError> {
    tokio::time::timeout(state.request_timeout, next.run(request))
        .await
        .map_err(|_| ApiError(Error::Timeout))
}
