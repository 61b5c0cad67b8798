// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Bazaar marketplace.
//!
//! This crate provides the adapter trait definitions, the error type, and the
//! domain types used throughout the Bazaar workspace. Every collaborator
//! (store, identity provider, media store, language model) is reached through
//! a trait defined here.

pub mod error;
pub mod traits;
pub mod types;

pub use error::BazaarError;
pub use types::{AdapterType, HealthStatus};

pub use traits::{
    DescriptionAdapter, IdentityAdapter, MediaAdapter, PluginAdapter, StorageAdapter,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_distinguished_from_service_errors() {
        assert!(BazaarError::Unauthenticated("no token".into()).is_client_error());
        assert!(BazaarError::AlreadySold.is_client_error());
        assert!(BazaarError::SelfPurchase.is_client_error());
        assert!(BazaarError::Forbidden("listing".into()).is_client_error());

        let storage = BazaarError::Storage {
            source: Box::new(std::io::Error::other("disk full")),
        };
        assert!(!storage.is_client_error());
        assert!(!BazaarError::provider("timeout").is_client_error());
        assert!(!BazaarError::media("bucket gone").is_client_error());
        assert!(!BazaarError::Internal("bug".into()).is_client_error());
    }

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;
        for ty in [
            AdapterType::Storage,
            AdapterType::Identity,
            AdapterType::Media,
            AdapterType::Description,
            AdapterType::Observability,
        ] {
            assert_eq!(AdapterType::from_str(&ty.to_string()).unwrap(), ty);
        }
    }

    #[test]
    fn error_messages_are_terse() {
        assert_eq!(BazaarError::AlreadySold.to_string(), "listing already sold");
        assert_eq!(BazaarError::ListingNotFound.to_string(), "listing not found");
        assert_eq!(
            BazaarError::BadRequest("name is required".into()).to_string(),
            "bad request: name is required"
        );
    }
}
