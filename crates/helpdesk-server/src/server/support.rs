//! Support tickets and their messages.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use helpdesk_core::ticket::TicketDraft;
use helpdesk_core::{Ticket, TicketMessage};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use super::error::{ApiResult, JsonBody, QueryParams};
use super::state::AppState;
use super::users::IdQuery;
use crate::auth::RequestIdentity;

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub id: i64,
    pub st: String,
}

#[derive(Debug, Deserialize)]
pub struct NewMessage {
    pub message: String,
    pub ticket_id: i64,
}

/// `POST /api/v1/support/ticket/create`
#[instrument(skip(state, draft))]
pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    identity: RequestIdentity,
    JsonBody(draft): JsonBody<TicketDraft>,
) -> ApiResult<Json<Ticket>> {
    let ticket = state.tickets.create(identity.id, draft).await?;
    Ok(Json(ticket))
}

/// `GET /api/v1/support/ticket?id=N`
#[instrument(skip(state))]
pub async fn ticket(
    State(state): State<Arc<AppState>>,
    _identity: RequestIdentity,
    QueryParams(query): QueryParams<IdQuery>,
) -> ApiResult<Json<Ticket>> {
    Ok(Json(state.tickets.find(query.id).await?))
}

/// `GET /api/v1/support/tickets`
#[instrument(skip(state))]
pub async fn tickets(
    State(state): State<Arc<AppState>>,
    identity: RequestIdentity,
) -> ApiResult<Json<Vec<Ticket>>> {
    Ok(Json(state.tickets.find_all(identity.id).await?))
}

/// `POST /api/v1/support/ticket/accept?id=N`, admin only. The caller becomes
/// the helper.
#[instrument(skip(state))]
pub async fn accept_ticket(
    State(state): State<Arc<AppState>>,
    identity: RequestIdentity,
    QueryParams(query): QueryParams<IdQuery>,
) -> ApiResult<Json<Ticket>> {
    identity.require_admin()?;
    Ok(Json(state.tickets.accept(query.id, identity.id).await?))
}

/// `GET /api/v1/support/ticket/status?id=N&st=S`
#[instrument(skip(state))]
pub async fn change_status(
    State(state): State<Arc<AppState>>,
    _identity: RequestIdentity,
    QueryParams(query): QueryParams<StatusQuery>,
) -> ApiResult<Json<Value>> {
    let ticket = state.tickets.change_status(query.id, &query.st).await?;
    Ok(Json(json!({
        "message": format!("status changed to {}", ticket.status)
    })))
}

/// `POST /api/v1/support/message/add`
#[instrument(skip(state, body))]
pub async fn add_message(
    State(state): State<Arc<AppState>>,
    identity: RequestIdentity,
    JsonBody(body): JsonBody<NewMessage>,
) -> ApiResult<Json<TicketMessage>> {
    let message = state
        .tickets
        .add_message(identity.id, body.ticket_id, body.message)
        .await?;
    Ok(Json(message))
}

/// `GET /api/v1/support/messages?id=N`
#[instrument(skip(state))]
pub async fn messages(
    State(state): State<Arc<AppState>>,
    _identity: RequestIdentity,
    QueryParams(query): QueryParams<IdQuery>,
) -> ApiResult<Json<Vec<TicketMessage>>> {
    Ok(Json(state.tickets.take_messages(query.id).await?))
}
