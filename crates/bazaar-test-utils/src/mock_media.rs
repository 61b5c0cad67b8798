// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory media store for deterministic testing.
//!
//! Uploaded objects are kept in a map keyed by object key. Uploads and URL
//! resolution can each be switched to fail, to exercise the error paths of
//! listing creation and image enrichment.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use bazaar_core::traits::{MediaAdapter, PluginAdapter};
use bazaar_core::types::{AdapterType, HealthStatus};
use bazaar_core::BazaarError;

/// A stored object: bytes and declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

pub struct MockMedia {
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
    fail_uploads: AtomicBool,
    fail_resolve: AtomicBool,
}

impl MockMedia {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            fail_uploads: AtomicBool::new(false),
            fail_resolve: AtomicBool::new(false),
        }
    }

    /// The URL a stored key resolves to.
    pub fn url_for(key: &str) -> String {
        format!("https://media.test/{key}?signed=1")
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_resolve(&self, fail: bool) {
        self.fail_resolve.store(fail, Ordering::SeqCst);
    }

    pub async fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().await.get(key).cloned()
    }

    pub async fn object_count(&self) -> usize {
        self.objects.lock().await.len()
    }
}

impl Default for MockMedia {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockMedia {
    fn name(&self) -> &str {
        "mock-media"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Media
    }

    async fn health_check(&self) -> Result<HealthStatus, BazaarError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BazaarError> {
        Ok(())
    }
}

#[async_trait]
impl MediaAdapter for MockMedia {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BazaarError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(BazaarError::media("mock upload failure"));
        }
        self.objects.lock().await.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(key.to_string())
    }

    async fn resolve_url(&self, reference: &str) -> Result<String, BazaarError> {
        if self.fail_resolve.load(Ordering::SeqCst) {
            return Err(BazaarError::media("mock resolve failure"));
        }
        Ok(Self::url_for(reference))
    }
}
