// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem-backed [`MediaAdapter`] with HMAC-signed URLs.

use std::path::PathBuf;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, warn};

use bazaar_config::model::MediaConfig;
use bazaar_core::{AdapterType, BazaarError, HealthStatus, MediaAdapter, PluginAdapter};

use crate::keys::{content_type_for, sanitize_key};

type HmacSha256 = Hmac<Sha256>;

/// Stores objects as files under `root_dir` and signs links to them.
pub struct LocalMediaStore {
    root: PathBuf,
    public_base_url: String,
    signing_key: Vec<u8>,
    url_ttl_secs: u64,
}

impl std::fmt::Debug for LocalMediaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalMediaStore")
            .field("root", &self.root)
            .field("public_base_url", &self.public_base_url)
            .field("signing_key", &"[redacted]")
            .field("url_ttl_secs", &self.url_ttl_secs)
            .finish()
    }
}

impl LocalMediaStore {
    pub fn from_config(config: &MediaConfig) -> Self {
        let signing_key = match &config.signing_key {
            Some(key) => key.as_bytes().to_vec(),
            None => {
                warn!("media.signing_key not set; signed URLs will not survive a restart");
                let mut key = uuid::Uuid::new_v4().as_bytes().to_vec();
                key.extend_from_slice(uuid::Uuid::new_v4().as_bytes());
                key
            }
        };
        Self {
            root: PathBuf::from(&config.root_dir),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            signing_key,
            url_ttl_secs: config.url_ttl_secs,
        }
    }

    fn mac(&self) -> Result<HmacSha256, BazaarError> {
        HmacSha256::new_from_slice(&self.signing_key).map_err(|e| BazaarError::Media {
            message: "invalid signing key".into(),
            source: Some(Box::new(e)),
        })
    }

    fn signature(&self, key: &str, expires: i64) -> Result<String, BazaarError> {
        let mut mac = self.mac()?;
        mac.update(key.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Build a URL for `key` that stays valid until `now + url_ttl_secs`.
    pub fn sign_url(&self, key: &str, now: i64) -> Result<String, BazaarError> {
        let expires = now.saturating_add(i64::try_from(self.url_ttl_secs).unwrap_or(i64::MAX));
        let signature = self.signature(key, expires)?;
        Ok(format!(
            "{}/media/{key}?expires={expires}&signature={signature}",
            self.public_base_url
        ))
    }

    /// Check a signed link. False when expired, tampered, or malformed.
    pub fn verify(&self, key: &str, expires: i64, signature: &str, now: i64) -> bool {
        if expires < now {
            return false;
        }
        let Ok(provided) = hex::decode(signature) else {
            return false;
        };
        let Ok(mut mac) = self.mac() else {
            return false;
        };
        mac.update(key.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        mac.verify_slice(&provided).is_ok()
    }

    /// Map a stored reference to an object key.
    ///
    /// Older rows may hold a full link under our own public base; those are
    /// cut back to the key. Foreign URLs are returned as `None`.
    pub fn normalize_reference(&self, reference: &str) -> Option<String> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        if let Some(rest) = reference.strip_prefix(&self.public_base_url) {
            let rest = rest.strip_prefix("/media/").unwrap_or(rest);
            let path = rest.split(['?', '#']).next().unwrap_or_default();
            return sanitize_key(path);
        }
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return None;
        }
        sanitize_key(reference)
    }

    fn object_path(&self, key: &str) -> Result<(String, PathBuf), BazaarError> {
        let key = sanitize_key(key).ok_or_else(|| BazaarError::BadRequest("empty media key".into()))?;
        let path = self.root.join(&key);
        Ok((key, path))
    }

    /// Read an object's bytes and content type. `None` when it does not exist.
    pub async fn read(&self, key: &str) -> Result<Option<(Vec<u8>, &'static str)>, BazaarError> {
        let (key, path) = self.object_path(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some((bytes, content_type_for(&key)))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BazaarError::Media {
                message: format!("cannot read {key}"),
                source: Some(Box::new(e)),
            }),
        }
    }
}

#[async_trait]
impl PluginAdapter for LocalMediaStore {
    fn name(&self) -> &str {
        "local-media"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Media
    }

    async fn health_check(&self) -> Result<HealthStatus, BazaarError> {
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(HealthStatus::Healthy),
            Ok(_) => Ok(HealthStatus::Unhealthy(format!(
                "{} is not a directory",
                self.root.display()
            ))),
            Err(e) => Ok(HealthStatus::Degraded(format!(
                "media root unavailable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), BazaarError> {
        Ok(())
    }
}

#[async_trait]
impl MediaAdapter for LocalMediaStore {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BazaarError> {
        let (key, path) = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BazaarError::Media {
                    message: format!("cannot create directory for {key}"),
                    source: Some(Box::new(e)),
                })?;
        }
        let size = bytes.len();
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| BazaarError::Media {
                message: format!("cannot write {key}"),
                source: Some(Box::new(e)),
            })?;
        debug!(key = %key, size, content_type, "media object stored");
        Ok(key)
    }

    async fn resolve_url(&self, reference: &str) -> Result<String, BazaarError> {
        match self.normalize_reference(reference) {
            Some(key) => self.sign_url(&key, chrono::Utc::now().timestamp()),
            None if reference.starts_with("http://") || reference.starts_with("https://") => {
                Ok(reference.to_string())
            }
            None => Err(BazaarError::media(format!(
                "unresolvable media reference: {reference:?}"
            ))),
        }
    }
}
