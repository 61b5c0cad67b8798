// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Unauthenticated endpoints: health, Prometheus scrape, and signed media.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ErrorResponse, QueryParams};
use crate::server::GatewayState;

/// Public health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
}

/// GET /health
pub async fn get_public_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}

/// GET /metrics (Prometheus text exposition)
pub async fn get_public_metrics(State(state): State<GatewayState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "metrics are disabled".into(),
            }),
        )
            .into_response(),
    }
}

/// Signature parameters of a media link.
#[derive(Debug, Deserialize)]
pub struct SignedQuery {
    #[serde(default)]
    pub expires: Option<i64>,
    #[serde(default)]
    pub signature: Option<String>,
}

fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ErrorResponse {
            error: "invalid or expired media link".into(),
        }),
    )
        .into_response()
}

/// GET /media/{*key}?expires=&signature=
///
/// Objects are always sent with `nosniff`; anything that is not a raster
/// image is sent as an attachment.
pub async fn get_media(
    State(state): State<GatewayState>,
    Path(key): Path<String>,
    query: Result<QueryParams<SignedQuery>, ApiError>,
) -> Result<Response, ApiError> {
    let Some(store) = state.media_files.as_ref() else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    let Ok(QueryParams(query)) = query else {
        return Ok(forbidden());
    };
    let (Some(expires), Some(signature)) = (query.expires, query.signature.as_deref()) else {
        return Ok(forbidden());
    };
    let now = chrono::Utc::now().timestamp();
    if !store.verify(&key, expires, signature, now) {
        tracing::debug!(key = %key, "rejected media link");
        return Ok(forbidden());
    }

    let Some((bytes, content_type)) = store.read(&key).await? else {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "media not found".into(),
            }),
        )
            .into_response());
    };
    let cache_control = format!("private, max-age={}", (expires - now).max(0));
    let disposition = if content_type == bazaar_media::OPAQUE_CONTENT_TYPE {
        "attachment"
    } else {
        "inline"
    };
    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CACHE_CONTROL, cache_control),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
            (header::CONTENT_DISPOSITION, disposition.to_string()),
        ],
        bytes,
    )
        .into_response())
}
