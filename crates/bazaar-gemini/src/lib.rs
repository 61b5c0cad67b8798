// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini provider adapter for listing description generation.
//!
//! This crate implements [`DescriptionAdapter`] over the Gemini
//! `generateContent` REST API. Prompt wording and output parsing belong to
//! the marketplace logic; this adapter only transports text and images.

pub mod client;
pub mod types;

use async_trait::async_trait;
use base64::Engine as _;
use bazaar_config::model::GeminiConfig;
use bazaar_core::error::BazaarError;
use bazaar_core::traits::{DescriptionAdapter, PluginAdapter};
use bazaar_core::types::{AdapterType, HealthStatus};
use tracing::{debug, info};

use crate::client::GeminiClient;
use crate::types::{Blob, Content, GenerateContentRequest, GenerationConfig, Part};

/// Gemini-backed description generator.
pub struct GeminiDescriber {
    client: GeminiClient,
    temperature: f32,
}

impl GeminiDescriber {
    /// Creates a describer from config, or `None` when no API key is available.
    ///
    /// # API Key Resolution
    /// 1. `config.gemini.api_key` if set and non-empty
    /// 2. `GEMINI_API_KEY` environment variable
    pub fn from_config(config: &GeminiConfig) -> Result<Option<Self>, BazaarError> {
        let Some(api_key) = resolve_api_key(&config.api_key) else {
            info!("Gemini API key not configured; description generation disabled");
            return Ok(None);
        };

        let mut client = GeminiClient::new(&api_key, config.model.clone())?;
        if let Some(base_url) = &config.base_url {
            client = client.with_base_url(base_url.as_str());
        }
        info!(model = %config.model, "Gemini describer initialized");

        Ok(Some(Self {
            client,
            temperature: config.temperature,
        }))
    }

    fn request(&self, parts: Vec<Part>) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".into()),
                parts,
            }],
            generation_config: Some(GenerationConfig {
                temperature: self.temperature,
            }),
        }
    }

    async fn generate(&self, parts: Vec<Part>) -> Result<String, BazaarError> {
        let response = self.client.generate_content(&self.request(parts)).await?;
        if let Some(usage) = &response.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "Gemini generation complete"
            );
        }
        response.text().ok_or_else(|| {
            let reason = response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .unwrap_or_else(|| "no candidates".into());
            BazaarError::provider(format!("model returned no text ({reason})"))
        })
    }
}

fn resolve_api_key(config_key: &Option<String>) -> Option<String> {
    if let Some(key) = config_key
        && !key.trim().is_empty()
    {
        return Some(key.clone());
    }
    std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
}

#[async_trait]
impl PluginAdapter for GeminiDescriber {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Description
    }

    async fn health_check(&self) -> Result<HealthStatus, BazaarError> {
        // No probe call: a generation costs quota.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BazaarError> {
        debug!("Gemini describer shutting down");
        Ok(())
    }
}

#[async_trait]
impl DescriptionAdapter for GeminiDescriber {
    async fn generate_text(&self, prompt: &str) -> Result<String, BazaarError> {
        self.generate(vec![Part::Text {
            text: prompt.to_string(),
        }])
        .await
    }

    async fn generate_from_image(
        &self,
        prompt: &str,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String, BazaarError> {
        let data = base64::engine::general_purpose::STANDARD.encode(image);
        self.generate(vec![
            Part::Text {
                text: prompt.to_string(),
            },
            Part::InlineData {
                inline_data: Blob {
                    mime_type: mime_type.to_string(),
                    data,
                },
            },
        ])
        .await
    }
}
