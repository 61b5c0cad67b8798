// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a complete marketplace with mock adapters and a
//! temp SQLite database. Tests drive it either through
//! [`Marketplace`] directly or through the HTTP router from
//! [`TestHarness::router`].

use std::sync::Arc;

use axum::Router;
use bazaar_config::model::{MarketConfig, StorageConfig};
use bazaar_core::traits::{DescriptionAdapter, StorageAdapter};
use bazaar_core::types::{Account, ExternalIdentity, Listing};
use bazaar_core::BazaarError;
use bazaar_gateway::{GatewayState, HealthState, build_router};
use bazaar_market::{ListingForm, Marketplace};
use bazaar_storage::SqliteStorage;

use crate::mock_describer::MockDescriber;
use crate::mock_identity::MockIdentity;
use crate::mock_media::MockMedia;

const TEST_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    with_describer: bool,
    market: MarketConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            with_describer: true,
            market: MarketConfig::default(),
        }
    }

    /// Set mock describer responses.
    pub fn with_describer_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Build without a language model, as when no API key is configured.
    pub fn without_describer(mut self) -> Self {
        self.with_describer = false;
        self
    }

    pub fn with_market_config(mut self, market: MarketConfig) -> Self {
        self.market = market;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, BazaarError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| BazaarError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        });
        storage.initialize().await?;
        let storage: Arc<dyn StorageAdapter + Send + Sync> = Arc::new(storage);

        let media = Arc::new(MockMedia::new());
        let identity = Arc::new(MockIdentity::new());
        let describer = self
            .with_describer
            .then(|| Arc::new(MockDescriber::with_responses(self.responses)));

        let market = Arc::new(Marketplace::new(
            storage.clone(),
            media.clone(),
            describer
                .clone()
                .map(|d| d as Arc<dyn DescriptionAdapter + Send + Sync>),
            self.market,
        ));

        Ok(TestHarness {
            storage,
            media,
            identity,
            describer,
            market,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with mock adapters and temp storage.
pub struct TestHarness {
    /// SQLite storage adapter (temp DB, cleaned up on drop).
    pub storage: Arc<dyn StorageAdapter + Send + Sync>,
    /// In-memory media store.
    pub media: Arc<MockMedia>,
    /// Identity provider accepting `test-token-<subject>`.
    pub identity: Arc<MockIdentity>,
    /// Mock language model, absent when built `without_describer`.
    pub describer: Option<Arc<MockDescriber>>,
    /// The marketplace under test.
    pub market: Arc<Marketplace>,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The full HTTP router over this harness's marketplace.
    pub fn router(&self) -> Router {
        let state = GatewayState {
            market: self.market.clone(),
            identity: self.identity.clone(),
            media_files: None,
            health: HealthState::new(None),
        };
        build_router(state, TEST_BODY_LIMIT)
    }

    /// The identity a request from `subject` carries.
    pub fn identity(&self, subject: &str) -> ExternalIdentity {
        MockIdentity::identity(subject)
    }

    /// Register an account for `subject`.
    pub async fn register(&self, subject: &str, name: &str) -> Result<Account, BazaarError> {
        self.market.register(&self.identity(subject), name).await
    }

    /// Create an image-less listing owned by `subject`.
    pub async fn create_listing(
        &self,
        subject: &str,
        name: &str,
        price: i64,
    ) -> Result<Listing, BazaarError> {
        self.market
            .create_listing(
                &self.identity(subject),
                ListingForm {
                    name: name.to_string(),
                    price,
                    description: format!("{name} in good condition"),
                },
                None,
            )
            .await
    }
}

/// A hand-built `multipart/form-data` body for router tests.
#[derive(Debug, Default)]
pub struct MultipartBody {
    parts: Vec<u8>,
}

impl MultipartBody {
    const BOUNDARY: &'static str = "bazaar-test-boundary";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.parts.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                Self::BOUNDARY
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.parts.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n",
                Self::BOUNDARY
            )
            .as_bytes(),
        );
        self.parts.extend_from_slice(bytes);
        self.parts.extend_from_slice(b"\r\n");
        self
    }

    /// Value for the `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", Self::BOUNDARY)
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.parts
            .extend_from_slice(format!("--{}--\r\n", Self::BOUNDARY).as_bytes());
        self.parts
    }
}
