// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the marketplace.
//!
//! Routes under `/users`, `/products` and `/messages` translate requests into
//! [`bazaar_market::Marketplace`] calls and map [`bazaar_core::BazaarError`]
//! onto status codes with a `{"error": ...}` body. `/health`, `/metrics` and
//! the signed `/media` links are served without a credential.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::{Caller, Viewer};
pub use error::{ApiError, ErrorResponse};
pub use server::{GatewayState, HealthState, build_router, start_server};
