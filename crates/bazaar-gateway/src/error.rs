// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of [`BazaarError`] to HTTP responses, and body extractors whose
//! rejections use the same error format.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use bazaar_core::BazaarError;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Short error description.
    pub error: String,
}

/// A handler failure, rendered as `{"error": ...}` with a mapped status.
#[derive(Debug)]
pub struct ApiError(pub BazaarError);

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(BazaarError::BadRequest(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BazaarError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            BazaarError::BadRequest(_) | BazaarError::SelfPurchase => StatusCode::BAD_REQUEST,
            BazaarError::AccountNotFound
            | BazaarError::ListingNotFound
            | BazaarError::NotFound(_)
            | BazaarError::Forbidden(_) => StatusCode::NOT_FOUND,
            BazaarError::AlreadySold | BazaarError::Conflict(_) => StatusCode::CONFLICT,
            BazaarError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            BazaarError::Storage { .. }
            | BazaarError::Media { .. }
            | BazaarError::Provider { .. }
            | BazaarError::Config(_)
            | BazaarError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<BazaarError> for ApiError {
    fn from(err: BazaarError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
            "internal server error".to_string()
        } else {
            tracing::debug!(status = %status, error = %self.0, "request rejected");
            self.0.to_string()
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// JSON request body; a malformed or incomplete body is a 400.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
        }
    }
}

/// Query string parameters; an undecodable query is a 400.
#[derive(Debug)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: BazaarError) -> StatusCode {
        ApiError(err).status()
    }

    #[test]
    fn taxonomy_maps_to_statuses() {
        assert_eq!(status_of(BazaarError::Unauthenticated("x".into())), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(BazaarError::BadRequest("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(BazaarError::SelfPurchase), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(BazaarError::AccountNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(BazaarError::ListingNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(BazaarError::Forbidden("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(BazaarError::AlreadySold), StatusCode::CONFLICT);
        assert_eq!(status_of(BazaarError::Conflict("x".into())), StatusCode::CONFLICT);
        assert_eq!(status_of(BazaarError::Unavailable("x".into())), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status_of(BazaarError::provider("x")), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_of(BazaarError::media("x")), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn internal_details_are_not_echoed() {
        let response = ApiError(BazaarError::Internal("db path /secret".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "internal server error");
    }

    #[tokio::test]
    async fn client_errors_carry_their_message() {
        let response = ApiError(BazaarError::AlreadySold).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "listing already sold");
    }
}
