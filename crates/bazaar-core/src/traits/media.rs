// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Media adapter trait for image storage and URL signing.

use async_trait::async_trait;

use crate::error::BazaarError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for the object store holding listing images and avatars.
#[async_trait]
pub trait MediaAdapter: PluginAdapter {
    /// Stores `bytes` under `key` and returns the reference to persist.
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BazaarError>;

    /// Resolves a stored reference to a time-limited displayable URL.
    async fn resolve_url(&self, reference: &str) -> Result<String, BazaarError>;
}
