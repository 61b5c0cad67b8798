// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `/messages` handlers. Every route requires a registered caller.

use axum::{
    Json,
    extract::{Path, State},
};
use bazaar_core::types::{ChatSummary, Message};
use bazaar_market::SendMessage;
use serde::Deserialize;

use crate::auth::Caller;
use crate::error::{ApiError, JsonBody, QueryParams};
use crate::handlers::StatusResponse;
use crate::server::GatewayState;

#[derive(Debug, Deserialize)]
pub struct ThreadQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    #[serde(default)]
    pub partner_id: String,
}

/// POST /messages
pub async fn send(
    State(state): State<GatewayState>,
    Caller(caller): Caller,
    JsonBody(body): JsonBody<SendMessage>,
) -> Result<Json<Message>, ApiError> {
    Ok(Json(state.market.send_message(&caller, body).await?))
}

/// GET /messages?user_id=
pub async fn thread(
    State(state): State<GatewayState>,
    Caller(caller): Caller,
    QueryParams(query): QueryParams<ThreadQuery>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let partner = query.user_id.unwrap_or_default();
    Ok(Json(state.market.thread(&caller, &partner).await?))
}

/// GET /messages/list
pub async fn conversations(
    State(state): State<GatewayState>,
    Caller(caller): Caller,
) -> Result<Json<Vec<ChatSummary>>, ApiError> {
    Ok(Json(state.market.conversations(&caller).await?))
}

/// POST /messages/read
pub async fn mark_read(
    State(state): State<GatewayState>,
    Caller(caller): Caller,
    JsonBody(body): JsonBody<MarkReadRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.market.mark_read(&caller, &body.partner_id).await?;
    Ok(Json(StatusResponse::new("ok")))
}

/// PUT /messages/{id}/unsend
pub async fn unsend(
    State(state): State<GatewayState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.market.unsend_message(&caller, &id).await?;
    Ok(Json(StatusResponse::new("unsent")))
}

/// DELETE /messages/{id}
pub async fn remove(
    State(state): State<GatewayState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.market.delete_message(&caller, &id).await?;
    Ok(Json(StatusResponse::new("deleted")))
}
