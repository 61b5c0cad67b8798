// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./bazaar.toml` > `~/.config/bazaar/bazaar.toml` > `/etc/bazaar/bazaar.toml`
//! with environment variable overrides via `BAZAAR_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::BazaarConfig;

/// Config sections, used to split `BAZAAR_<SECTION>_<KEY>` env vars.
const SECTIONS: &[&str] = &[
    "server", "storage", "auth", "media", "gemini", "market", "logging",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/bazaar/bazaar.toml` (system-wide)
/// 3. `~/.config/bazaar/bazaar.toml` (user XDG config)
/// 4. `./bazaar.toml` (local directory)
/// 5. `BAZAAR_*` environment variables
pub fn load_config() -> Result<BazaarConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<BazaarConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BazaarConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BazaarConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BazaarConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(BazaarConfig::default()))
        .merge(Toml::file("/etc/bazaar/bazaar.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("bazaar/bazaar.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("bazaar.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `BAZAAR_GEMINI_API_KEY` must map to `gemini.api_key`, not
/// `gemini.api.key`.
fn env_provider() -> Env {
    Env::prefixed("BAZAAR_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
