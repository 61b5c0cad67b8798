// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Marketplace logic layer.
//!
//! [`Marketplace`] holds the collaborators (store, media store, optional
//! description model) and implements every user-facing operation on top of
//! them. It owns no mutable state: each call runs directly against the
//! store of record, so one instance is shared by all request handlers.

pub mod accounts;
pub mod describe;
pub mod listings;
pub mod messaging;
pub mod search;
pub mod validation;

use std::sync::Arc;

use bazaar_config::model::MarketConfig;
use bazaar_core::traits::{DescriptionAdapter, MediaAdapter, StorageAdapter};
use tracing::warn;

pub use accounts::ProfileForm;
pub use listings::ListingForm;
pub use messaging::SendMessage;
pub use search::{ListingFilter, ListingView};

/// MIME type assumed when an upload does not declare one.
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// An image received from a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// The declared content type, or [`DEFAULT_IMAGE_MIME`].
    pub fn mime_type(&self) -> &str {
        self.content_type
            .as_deref()
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or(DEFAULT_IMAGE_MIME)
    }
}

/// The marketplace service.
pub struct Marketplace {
    storage: Arc<dyn StorageAdapter + Send + Sync>,
    media: Arc<dyn MediaAdapter + Send + Sync>,
    describer: Option<Arc<dyn DescriptionAdapter + Send + Sync>>,
    config: MarketConfig,
}

impl Marketplace {
    pub fn new(
        storage: Arc<dyn StorageAdapter + Send + Sync>,
        media: Arc<dyn MediaAdapter + Send + Sync>,
        describer: Option<Arc<dyn DescriptionAdapter + Send + Sync>>,
        config: MarketConfig,
    ) -> Self {
        Self {
            storage,
            media,
            describer,
            config,
        }
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Whether AI description generation is available.
    pub fn has_describer(&self) -> bool {
        self.describer.is_some()
    }

    /// Resolve a stored image reference to a displayable URL.
    ///
    /// A failed resolution leaves the stored reference in place.
    async fn resolve_image(&self, reference: Option<String>) -> Option<String> {
        let reference = reference?;
        match self.media.resolve_url(&reference).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(reference = %reference, error = %e, "image URL resolution failed");
                Some(reference)
            }
        }
    }
}
