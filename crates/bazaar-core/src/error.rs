// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Bazaar marketplace.

use thiserror::Error;

/// The primary error type used across all Bazaar adapter traits and marketplace operations.
///
/// The logic layer returns these typed failures; the gateway maps them to
/// HTTP status codes.
#[derive(Debug, Error)]
pub enum BazaarError {
    /// Missing, malformed, or rejected identity credential.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// A required field is missing or a value is out of range.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The caller's identity does not resolve to a registered account.
    #[error("account not found")]
    AccountNotFound,

    /// The referenced listing does not exist.
    #[error("listing not found")]
    ListingNotFound,

    /// A resource other than an account or listing is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// The resource exists but is not owned by the caller.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A seller attempted to buy their own listing.
    #[error("cannot purchase your own listing")]
    SelfPurchase,

    /// The listing already has a buyer.
    #[error("listing already sold")]
    AlreadySold,

    /// The request conflicts with the current state of a resource.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Media store errors (upload failure, unreadable object, URL signing).
    #[error("media error: {message}")]
    Media {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Description provider errors (API failure, unparseable model output).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An optional collaborator is not configured in this deployment.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BazaarError {
    /// Shorthand for a media error without an underlying source.
    pub fn media(message: impl Into<String>) -> Self {
        Self::Media {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true for failures caused by the caller rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated(_)
                | Self::BadRequest(_)
                | Self::AccountNotFound
                | Self::ListingNotFound
                | Self::NotFound(_)
                | Self::Forbidden(_)
                | Self::SelfPurchase
                | Self::AlreadySold
                | Self::Conflict(_)
        )
    }
}
