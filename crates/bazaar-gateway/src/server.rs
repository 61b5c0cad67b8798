// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use bazaar_config::model::ServerConfig;
use bazaar_core::BazaarError;
use bazaar_core::traits::IdentityAdapter;
use bazaar_market::Marketplace;
use bazaar_media::LocalMediaStore;
use tokio_util::sync::CancellationToken;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::cors::CorsLayer;
use tower_http::trace::{MakeSpan, TraceLayer};
use tracing::{Span, info_span};

use crate::auth::identity_middleware;
use crate::handlers::{messages, products, public, users};

/// Health state for unauthenticated health/metrics endpoints.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    /// Optional Prometheus metrics render function.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

impl HealthState {
    pub fn new(prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>) -> Self {
        Self {
            start_time: std::time::Instant::now(),
            prometheus_render,
        }
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Marketplace logic.
    pub market: Arc<Marketplace>,
    /// Bearer credential verifier.
    pub identity: Arc<dyn IdentityAdapter + Send + Sync>,
    /// Local media store whose signed links this gateway serves. `None`
    /// when media lives behind another host.
    pub media_files: Option<Arc<LocalMediaStore>>,
    /// Health state for unauthenticated endpoints.
    pub health: HealthState,
}

/// Span per request carrying method and URI.
#[derive(Clone, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, req: &Request<B>) -> Span {
        info_span!(
            "http_request",
            method = %req.method(),
            uri = %req.uri().path(),
        )
    }
}

fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan> {
    TraceLayer::new_for_http().make_span_with(RequestSpan)
}

/// Build the complete application router.
///
/// Routes:
/// - `GET /health`, `GET /metrics`, `GET /media/{*key}` (public)
/// - `/users...`, `/products...`, `/messages...` (identity-aware)
pub fn build_router(state: GatewayState, max_body_bytes: usize) -> Router {
    let api_routes = Router::new()
        .route("/users", post(users::register).get(users::search))
        .route("/users/me", get(users::get_me).put(users::update_me))
        .route("/users/me/products", get(users::my_products))
        .route("/users/me/purchases", get(users::my_purchases))
        .route("/users/me/likes", get(users::my_likes))
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}/products", get(users::user_products))
        .route(
            "/products",
            post(products::create)
                .get(products::list)
                .put(products::update)
                .delete(products::remove),
        )
        .route(
            "/products/generate-description",
            post(products::generate_description),
        )
        .route(
            "/products/generate-from-image",
            post(products::generate_from_image),
        )
        .route("/products/{id}", get(products::detail))
        .route("/products/{id}/purchase", post(products::purchase))
        .route(
            "/products/{id}/like",
            get(products::like_status).post(products::toggle_like),
        )
        .route("/messages", post(messages::send).get(messages::thread))
        .route("/messages/list", get(messages::conversations))
        .route("/messages/read", post(messages::mark_read))
        .route("/messages/{id}/unsend", put(messages::unsend))
        .route("/messages/{id}", delete(messages::remove))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ));

    // Unauthenticated public routes.
    let mut public_routes = Router::new()
        .route("/health", get(public::get_public_health))
        .route("/metrics", get(public::get_public_metrics));
    if state.media_files.is_some() {
        public_routes = public_routes.route("/media/{*key}", get(public::get_media));
    }

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(trace_layer())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the gateway until `cancel` fires, then drain in-flight requests.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), BazaarError> {
    let app = build_router(state, config.max_upload_bytes);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| BazaarError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| BazaarError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
