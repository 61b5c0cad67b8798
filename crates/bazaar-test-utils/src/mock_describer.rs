// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock language model for description generation tests.
//!
//! Responses are popped from a FIFO queue. When the queue is empty, a
//! default "mock description" text is returned. Every prompt is recorded.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use bazaar_core::traits::{DescriptionAdapter, PluginAdapter};
use bazaar_core::types::{AdapterType, HealthStatus};
use bazaar_core::BazaarError;

/// A prompt the describer received, with the image size when one was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPrompt {
    pub prompt: String,
    pub image_bytes: Option<usize>,
    pub mime_type: Option<String>,
}

pub struct MockDescriber {
    responses: Arc<Mutex<VecDeque<Result<String, String>>>>,
    prompts: Arc<Mutex<Vec<RecordedPrompt>>>,
}

impl MockDescriber {
    pub fn new() -> Self {
        Self::with_responses(Vec::new())
    }

    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into_iter().map(Ok).collect())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn add_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(Ok(text.into()));
    }

    /// Queue a provider failure.
    pub async fn add_failure(&self, message: impl Into<String>) {
        self.responses.lock().await.push_back(Err(message.into()));
    }

    pub async fn prompts(&self) -> Vec<RecordedPrompt> {
        self.prompts.lock().await.clone()
    }

    async fn next_response(&self, recorded: RecordedPrompt) -> Result<String, BazaarError> {
        self.prompts.lock().await.push(recorded);
        match self.responses.lock().await.pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(BazaarError::provider(message)),
            None => Ok("mock description".to_string()),
        }
    }
}

impl Default for MockDescriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockDescriber {
    fn name(&self) -> &str {
        "mock-describer"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Description
    }

    async fn health_check(&self) -> Result<HealthStatus, BazaarError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BazaarError> {
        Ok(())
    }
}

#[async_trait]
impl DescriptionAdapter for MockDescriber {
    async fn generate_text(&self, prompt: &str) -> Result<String, BazaarError> {
        self.next_response(RecordedPrompt {
            prompt: prompt.to_string(),
            image_bytes: None,
            mime_type: None,
        })
        .await
    }

    async fn generate_from_image(
        &self,
        prompt: &str,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String, BazaarError> {
        self.next_response(RecordedPrompt {
            prompt: prompt.to_string(),
            image_bytes: Some(image.len()),
            mime_type: Some(mime_type.to_string()),
        })
        .await
    }
}
