// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity middleware and extractors.
//!
//! Every request passes through [`identity_middleware`], which verifies an
//! `Authorization: Bearer <token>` header with the identity provider and
//! stores the outcome as a [`Viewer`]. A missing or rejected credential
//! yields an anonymous viewer; handlers that need an identity take a
//! [`Caller`], which turns an anonymous viewer into a 401.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use bazaar_core::BazaarError;
use bazaar_core::types::ExternalIdentity;

use crate::error::ApiError;
use crate::server::GatewayState;

/// The verified identity of the request, if any.
#[derive(Debug, Clone, Default)]
pub struct Viewer(pub Option<ExternalIdentity>);

impl Viewer {
    pub fn identity(&self) -> Option<&ExternalIdentity> {
        self.0.as_ref()
    }
}

/// A request that must carry a valid credential.
#[derive(Debug, Clone)]
pub struct Caller(pub ExternalIdentity);

/// Verify the bearer credential, if present, and attach a [`Viewer`].
pub async fn identity_middleware(
    State(state): State<GatewayState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = bearer_token(request.headers()).map(str::to_owned);
    let identity = match token {
        Some(token) => match state.identity.verify(&token).await {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::debug!(error = %e, "bearer credential rejected; treating as anonymous");
                None
            }
        },
        None => None,
    };
    request.extensions_mut().insert(Viewer(identity));
    next.run(request).await
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Viewer>().cloned().unwrap_or_default())
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Viewer>()
            .and_then(|viewer| viewer.0.clone())
            .map(Caller)
            .ok_or_else(|| {
                ApiError(BazaarError::Unauthenticated(
                    "missing or invalid credential".into(),
                ))
            })
    }
}
