// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Bazaar marketplace.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Bazaar configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BazaarConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Identity token verification settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Image storage and URL signing settings.
    #[serde(default)]
    pub media: MediaConfig,

    /// Gemini API settings for description generation.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Marketplace behavior settings.
    #[serde(default)]
    pub market: MarketConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum accepted request body size in bytes (multipart uploads included).
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL mode for concurrent reads.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|d| d.join("bazaar").join("bazaar.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("bazaar.db"))
        .display()
        .to_string()
}

fn default_true() -> bool {
    true
}

/// Identity token verification configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Signature algorithm of issued tokens: `HS256` or `RS256`.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Shared secret for `HS256`.
    #[serde(default)]
    pub secret: Option<String>,

    /// PEM-encoded public key file for `RS256`.
    #[serde(default)]
    pub public_key_path: Option<String>,

    /// Expected `iss` claim. Unchecked when unset.
    #[serde(default)]
    pub issuer: Option<String>,

    /// Expected `aud` claim. Unchecked when unset.
    #[serde(default)]
    pub audience: Option<String>,

    /// Clock skew tolerance for `exp`/`nbf`, in seconds.
    #[serde(default = "default_leeway_secs")]
    pub leeway_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            secret: None,
            public_key_path: None,
            issuer: None,
            audience: None,
            leeway_secs: default_leeway_secs(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("algorithm", &self.algorithm)
            .field("secret", &self.secret.as_ref().map(|_| "[redacted]"))
            .field("public_key_path", &self.public_key_path)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_leeway_secs() -> u64 {
    60
}

/// Image storage configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MediaConfig {
    /// Directory holding uploaded objects.
    #[serde(default = "default_media_root")]
    pub root_dir: String,

    /// Externally reachable base URL used when building signed links.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// HMAC key for URL signatures. A random key is generated per process when unset.
    #[serde(default)]
    pub signing_key: Option<String>,

    /// Lifetime of a signed URL, in seconds.
    #[serde(default = "default_url_ttl_secs")]
    pub url_ttl_secs: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root_dir: default_media_root(),
            public_base_url: default_public_base_url(),
            signing_key: None,
            url_ttl_secs: default_url_ttl_secs(),
        }
    }
}

impl std::fmt::Debug for MediaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaConfig")
            .field("root_dir", &self.root_dir)
            .field("public_base_url", &self.public_base_url)
            .field("signing_key", &self.signing_key.as_ref().map(|_| "[redacted]"))
            .field("url_ttl_secs", &self.url_ttl_secs)
            .finish()
    }
}

fn default_media_root() -> String {
    dirs::data_dir()
        .map(|d| d.join("bazaar").join("media"))
        .unwrap_or_else(|| std::path::PathBuf::from("media"))
        .display()
        .to_string()
}

fn default_public_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_url_ttl_secs() -> u64 {
    15 * 60
}

/// Gemini API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. Description generation is disabled when unset.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Override for the API base URL.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            temperature: default_temperature(),
            base_url: None,
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

/// Marketplace behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MarketConfig {
    /// Page size used when a request omits `limit`.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Largest page size a request may ask for.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    /// Whether owners may edit a listing after it has been sold.
    #[serde(default = "default_true")]
    pub allow_edit_after_sale: bool,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            allow_edit_after_sale: true,
        }
    }
}

fn default_page_size() -> u32 {
    20
}

fn default_max_page_size() -> u32 {
    100
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = BazaarConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.market.default_page_size, 20);
        assert_eq!(config.media.url_ttl_secs, 900);
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert!(config.storage.database_path.ends_with("bazaar.db"));
        assert!(config.market.allow_edit_after_sale);
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut config = BazaarConfig::default();
        config.auth.secret = Some("hs-secret".into());
        config.media.signing_key = Some("sign-secret".into());
        config.gemini.api_key = Some("gm-secret".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("hs-secret"));
        assert!(!debug.contains("sign-secret"));
        assert!(!debug.contains("gm-secret"));
        assert!(debug.contains("[redacted]"));
    }
}
