// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` API.
//!
//! Provides [`GeminiClient`] which handles request construction,
//! and error mapping.

use std::time::Duration;

use bazaar_core::BazaarError;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};

/// Default base URL of the Generative Language API.
pub const API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// HTTP client for Gemini API communication.
///
/// Manages the API key header and connection pooling. Failed calls are
/// not retried.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Creates a new Gemini API client for `model`.
    pub fn new(api_key: &str, model: String) -> Result<Self, BazaarError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| BazaarError::Config(format!("invalid API key header value: {e}")))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| BazaarError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            model,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (proxies, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Sends a request and returns the full response.
    ///
    /// Any non-success status is surfaced immediately as a provider error.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, BazaarError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(request)
            .send()
            .await
            .map_err(|e| BazaarError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "generateContent response received");

        let body = response.text().await.map_err(|e| BazaarError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| BazaarError::Provider {
                message: format!("failed to parse API response: {e}"),
                source: Some(Box::new(e)),
            });
        }

        let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_err) => format!(
                "Gemini API error ({} {}): {}",
                api_err.error.code, api_err.error.status, api_err.error.message
            ),
            Err(_) => format!("API returned {status}: {body}"),
        };
        warn!(status = %status, "generateContent failed");
        Err(BazaarError::provider(message))
    }
}
