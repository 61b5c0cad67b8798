// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints that serde attributes cannot express, such as
//! algorithm/key pairings and page-size ordering.

use crate::diagnostic::ConfigError;
use crate::model::BazaarConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or every collected error
/// (does not fail fast).
pub fn validate_config(config: &BazaarConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("server.host must not be empty"));
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        errors.push(ConfigError::validation(format!(
            "server.host `{host}` is not a valid IP address or hostname"
        )));
    }

    if config.server.max_upload_bytes == 0 {
        errors.push(ConfigError::validation(
            "server.max_upload_bytes must be at least 1",
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }

    match config.auth.algorithm.as_str() {
        "HS256" => {
            if config.auth.secret.as_deref().is_none_or(str::is_empty) {
                errors.push(ConfigError::validation(
                    "auth.secret is required when auth.algorithm is HS256",
                ));
            }
        }
        "RS256" => {
            if config.auth.public_key_path.as_deref().is_none_or(str::is_empty) {
                errors.push(ConfigError::validation(
                    "auth.public_key_path is required when auth.algorithm is RS256",
                ));
            }
        }
        other => errors.push(ConfigError::validation(format!(
            "auth.algorithm must be HS256 or RS256, got `{other}`"
        ))),
    }

    if config.media.root_dir.trim().is_empty() {
        errors.push(ConfigError::validation("media.root_dir must not be empty"));
    }

    if config.media.url_ttl_secs == 0 {
        errors.push(ConfigError::validation(
            "media.url_ttl_secs must be at least 1",
        ));
    }

    let temperature = config.gemini.temperature;
    if !(0.0..=2.0).contains(&temperature) {
        errors.push(ConfigError::validation(format!(
            "gemini.temperature must be between 0.0 and 2.0, got {temperature}"
        )));
    }

    if config.market.default_page_size == 0 {
        errors.push(ConfigError::validation(
            "market.default_page_size must be at least 1",
        ));
    }

    if config.market.max_page_size < config.market.default_page_size {
        errors.push(ConfigError::validation(format!(
            "market.max_page_size ({}) must not be smaller than market.default_page_size ({})",
            config.market.max_page_size, config.market.default_page_size
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> BazaarConfig {
        let mut config = BazaarConfig::default();
        config.auth.secret = Some("test-secret".into());
        config
    }

    #[test]
    fn config_with_secret_validates() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn hs256_without_secret_fails() {
        let config = BazaarConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("auth.secret"));
    }

    #[test]
    fn rs256_requires_public_key_path() {
        let mut config = valid_config();
        config.auth.algorithm = "RS256".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("auth.public_key_path"));
    }

    #[test]
    fn unknown_algorithm_fails() {
        let mut config = valid_config();
        config.auth.algorithm = "none".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("HS256 or RS256"));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = valid_config();
        config.storage.database_path = " ".into();
        config.market.default_page_size = 0;
        config.gemini.temperature = 3.5;
        config.media.url_ttl_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4, "got: {errors:?}");
    }

    #[test]
    fn max_page_size_below_default_fails() {
        let mut config = valid_config();
        config.market.default_page_size = 50;
        config.market.max_page_size = 10;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("market.max_page_size"));
    }

    #[test]
    fn invalid_host_fails() {
        let mut config = valid_config();
        config.server.host = "not a host!".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("server.host"));
    }
}
