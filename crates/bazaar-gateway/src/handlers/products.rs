// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `/products` handlers: listing lifecycle, search, purchase, likes, and
//! AI-assisted descriptions.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::Multipart;
use bazaar_core::types::{GeneratedListing, Listing, ListingPage, ListingUpdate};
use bazaar_market::{ListingFilter, ListingForm, ListingView, validation};
use serde::{Deserialize, Serialize};

use crate::auth::{Caller, Viewer};
use crate::error::{ApiError, JsonBody, QueryParams};
use crate::handlers::{LikeResponse, StatusResponse, read_form};
use crate::server::GatewayState;

/// `?id=` selector of the update and delete endpoints.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    #[serde(default)]
    pub id: Option<String>,
}

impl IdQuery {
    fn required(&self) -> Result<String, ApiError> {
        Ok(validation::required_id("id", self.id.as_deref().unwrap_or_default())?)
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub keywords: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub description: String,
}

/// POST /products (multipart: `name`, `price`, `description`, optional `image`)
pub async fn create(
    State(state): State<GatewayState>,
    Caller(caller): Caller,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Listing>), ApiError> {
    let mut form = read_form(multipart).await?;
    let price = match form.text("price") {
        Some(raw) => validation::price(raw)?,
        None => return Err(ApiError::bad_request("price is required")),
    };
    let listing_form = ListingForm {
        name: form.take_text("name").unwrap_or_default(),
        price,
        description: form.take_text("description").unwrap_or_default(),
    };

    let listing = state
        .market
        .create_listing(&caller, listing_form, form.image.take())
        .await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// GET /products
pub async fn list(
    State(state): State<GatewayState>,
    viewer: Viewer,
    QueryParams(filter): QueryParams<ListingFilter>,
) -> Result<Json<ListingPage>, ApiError> {
    let page = state
        .market
        .browse(viewer.identity(), ListingView::All, &filter)
        .await?;
    Ok(Json(page))
}

/// PUT /products?id=
pub async fn update(
    State(state): State<GatewayState>,
    Caller(caller): Caller,
    QueryParams(query): QueryParams<IdQuery>,
    JsonBody(body): JsonBody<ListingUpdate>,
) -> Result<Json<Listing>, ApiError> {
    let id = query.required()?;
    Ok(Json(state.market.update_listing(&caller, &id, body).await?))
}

/// DELETE /products?id=
pub async fn remove(
    State(state): State<GatewayState>,
    Caller(caller): Caller,
    QueryParams(query): QueryParams<IdQuery>,
) -> Result<Json<StatusResponse>, ApiError> {
    let id = query.required()?;
    state.market.delete_listing(&caller, &id).await?;
    Ok(Json(StatusResponse::new("deleted")))
}

/// GET /products/{id}
pub async fn detail(
    State(state): State<GatewayState>,
    viewer: Viewer,
    Path(id): Path<String>,
) -> Result<Json<Listing>, ApiError> {
    Ok(Json(state.market.get_listing(viewer.identity(), &id).await?))
}

/// POST /products/{id}/purchase
pub async fn purchase(
    State(state): State<GatewayState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.market.purchase(&caller, &id).await?;
    Ok(Json(StatusResponse::new("purchased")))
}

/// GET /products/{id}/like
pub async fn like_status(
    State(state): State<GatewayState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, ApiError> {
    let liked = state.market.like_status(&caller, &id).await?;
    Ok(Json(LikeResponse { liked }))
}

/// POST /products/{id}/like
pub async fn toggle_like(
    State(state): State<GatewayState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, ApiError> {
    let liked = state.market.toggle_like(&caller, &id).await?;
    Ok(Json(LikeResponse { liked }))
}

/// POST /products/generate-description
pub async fn generate_description(
    State(state): State<GatewayState>,
    _caller: Caller,
    JsonBody(body): JsonBody<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let description = state
        .market
        .generate_description(&body.name, &body.keywords)
        .await?;
    Ok(Json(GenerateResponse { description }))
}

/// POST /products/generate-from-image (multipart: `image`)
pub async fn generate_from_image(
    State(state): State<GatewayState>,
    _caller: Caller,
    multipart: Multipart,
) -> Result<Json<GeneratedListing>, ApiError> {
    let mut form = read_form(multipart).await?;
    let image = form
        .image
        .take()
        .ok_or_else(|| ApiError::bad_request("image is required"))?;
    Ok(Json(state.market.generate_from_image(image).await?))
}
