//! HTTP API for Helpdesk server.

pub mod accounts;
pub mod error;
pub mod middleware;
pub mod notifications;
pub mod state;
pub mod support;
pub mod users;

#[cfg(test)]
mod support_tests;
#[cfg(test)]
pub(crate) mod test_helpers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};
pub use middleware::{AUTH_HEADER, access_gate, bearer_token, deadline};
pub use state::AppState;

/// Routes that require an access token.
fn api_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/user", get(users::find_user))
        .route("/me", get(users::me))
        .route("/updateUser", post(users::update_user))
        .route("/notif/update", get(notifications::unread))
        .route("/notif/check", post(notifications::check))
        .route("/notif/create", post(notifications::create))
        .route("/support/ticket/create", post(support::create_ticket))
        .route("/support/ticket", get(support::ticket))
        .route("/support/tickets", get(support::tickets))
        .route("/support/ticket/accept", post(support::accept_ticket))
        .route("/support/ticket/status", get(support::change_status))
        .route("/support/message/add", post(support::add_message))
        .route("/support/messages", get(support::messages))
        .layer(axum::middleware::from_fn_with_state(
            Arc::clone(state),
            access_gate,
        ))
}

pub fn build_router(state: AppState) -> Router {
    let state = Arc::new(state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/signup", post(accounts::sign_up))
        .route("/signin", post(accounts::sign_in))
        .route("/checkAccess", get(accounts::check_access))
        .route("/health", get(accounts::health))
        .nest("/api/v1", api_routes(&state))
        .layer(axum::middleware::from_fn_with_state(
            Arc::clone(&state),
            deadline,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
