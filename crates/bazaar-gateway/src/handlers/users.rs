// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `/users` handlers: registration, profiles, account search, and the
//! per-user listing views.

use axum::{
    Json,
    extract::{FromRequest, Path, Request, State},
    http::header,
};
use axum_extra::extract::Multipart;
use bazaar_core::types::{Account, ListingPage, PublicAccount};
use bazaar_market::{ListingFilter, ListingView, ProfileForm};
use serde::Deserialize;

use crate::auth::{Caller, Viewer};
use crate::error::{ApiError, JsonBody, QueryParams};
use crate::handlers::read_form;
use crate::server::GatewayState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
}

/// JSON form of a profile update (without an avatar).
#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserSearchQuery {
    #[serde(default)]
    pub name: Option<String>,
}

/// POST /users
pub async fn register(
    State(state): State<GatewayState>,
    Caller(caller): Caller,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<Json<Account>, ApiError> {
    Ok(Json(state.market.register(&caller, &body.name).await?))
}

/// GET /users/me
pub async fn get_me(
    State(state): State<GatewayState>,
    Caller(caller): Caller,
) -> Result<Json<Account>, ApiError> {
    Ok(Json(state.market.me(&caller).await?))
}

/// PUT /users/me
///
/// Accepts `multipart/form-data` (`name`, `bio`, optional `image`) or a
/// JSON body with `name` and `bio`.
pub async fn update_me(
    State(state): State<GatewayState>,
    Caller(caller): Caller,
    request: Request,
) -> Result<Json<Account>, ApiError> {
    let is_json = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    let form = if is_json {
        let JsonBody(body) = JsonBody::<ProfileRequest>::from_request(request, &()).await?;
        ProfileForm {
            name: body.name,
            bio: body.bio,
            image: None,
        }
    } else {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        let mut form = read_form(multipart).await?;
        ProfileForm {
            name: form.take_text("name").unwrap_or_default(),
            bio: form.take_text("bio"),
            image: form.image.take(),
        }
    };

    Ok(Json(state.market.update_profile(&caller, form).await?))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<PublicAccount>, ApiError> {
    Ok(Json(state.market.public_profile(&id).await?))
}

/// GET /users?name=
pub async fn search(
    State(state): State<GatewayState>,
    QueryParams(query): QueryParams<UserSearchQuery>,
) -> Result<Json<Vec<PublicAccount>>, ApiError> {
    let name = query.name.unwrap_or_default();
    Ok(Json(state.market.search_accounts(&name).await?))
}

/// GET /users/{id}/products
pub async fn user_products(
    State(state): State<GatewayState>,
    viewer: Viewer,
    Path(id): Path<String>,
    QueryParams(filter): QueryParams<ListingFilter>,
) -> Result<Json<ListingPage>, ApiError> {
    let page = state
        .market
        .browse(viewer.identity(), ListingView::ByUser(id), &filter)
        .await?;
    Ok(Json(page))
}

async fn my_view(
    state: &GatewayState,
    caller: &Caller,
    view: ListingView,
    filter: &ListingFilter,
) -> Result<Json<ListingPage>, ApiError> {
    Ok(Json(state.market.browse(Some(&caller.0), view, filter).await?))
}

/// GET /users/me/products
pub async fn my_products(
    State(state): State<GatewayState>,
    caller: Caller,
    QueryParams(filter): QueryParams<ListingFilter>,
) -> Result<Json<ListingPage>, ApiError> {
    my_view(&state, &caller, ListingView::MySelling, &filter).await
}

/// GET /users/me/purchases
pub async fn my_purchases(
    State(state): State<GatewayState>,
    caller: Caller,
    QueryParams(filter): QueryParams<ListingFilter>,
) -> Result<Json<ListingPage>, ApiError> {
    my_view(&state, &caller, ListingView::MyPurchases, &filter).await
}

/// GET /users/me/likes
pub async fn my_likes(
    State(state): State<GatewayState>,
    caller: Caller,
    QueryParams(filter): QueryParams<ListingFilter>,
) -> Result<Json<ListingPage>, ApiError> {
    my_view(&state, &caller, ListingView::MyLikes, &filter).await
}
