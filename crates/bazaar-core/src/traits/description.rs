// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Description adapter trait for the hosted language model.

use async_trait::async_trait;

use crate::error::BazaarError;
use crate::traits::adapter::PluginAdapter;

/// Adapter that turns prompts (optionally with a photo) into generated text.
///
/// Prompt construction and output parsing live in the logic layer; the
/// adapter only transports them.
#[async_trait]
pub trait DescriptionAdapter: PluginAdapter {
    /// Generates text for a text-only prompt.
    async fn generate_text(&self, prompt: &str) -> Result<String, BazaarError>;

    /// Generates text for a prompt accompanied by an image.
    async fn generate_from_image(
        &self,
        prompt: &str,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String, BazaarError>;
}
