// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Bazaar configuration system.

use bazaar_config::diagnostic::ConfigError;
use bazaar_config::model::BazaarConfig;
use bazaar_config::{load_and_validate_str, load_config_from_path, load_config_from_str};

/// Valid TOML with every section deserializes successfully.
#[test]
fn full_toml_deserializes() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
max_upload_bytes = 1048576

[storage]
database_path = "/tmp/bazaar-test.db"
wal_mode = false

[auth]
algorithm = "HS256"
secret = "s3cret"
issuer = "https://issuer.example"
audience = "bazaar"
leeway_secs = 5

[media]
root_dir = "/tmp/bazaar-media"
public_base_url = "https://market.example"
signing_key = "k"
url_ttl_secs = 60

[gemini]
api_key = "gm-key"
model = "gemini-2.5-pro"
temperature = 0.2

[market]
default_page_size = 10
max_page_size = 50
allow_edit_after_sale = false

[logging]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should parse");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
    assert!(!config.storage.wal_mode);
    assert_eq!(config.auth.issuer.as_deref(), Some("https://issuer.example"));
    assert_eq!(config.media.url_ttl_secs, 60);
    assert_eq!(config.gemini.model, "gemini-2.5-pro");
    assert_eq!(config.market.max_page_size, 50);
    assert!(!config.market.allow_edit_after_sale);
    assert_eq!(config.logging.level, "debug");
}

/// Sections left out of the file fall back to defaults.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("[server]\nport = 8100\n").unwrap();
    assert_eq!(config.server.port, 8100);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.market.default_page_size, 20);
    assert_eq!(config.auth.algorithm, "HS256");
}

/// A typo inside a section is rejected with a suggestion.
#[test]
fn unknown_key_suggests_correction() {
    let toml = "[auth]\nsecret = \"x\"\n\n[market]\ndefault_pagesize = 5\n";
    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key,
            suggestion,
            valid_keys,
            span,
            ..
        } => {
            assert_eq!(key, "default_pagesize");
            assert_eq!(suggestion.as_deref(), Some("default_page_size"));
            assert!(valid_keys.contains("max_page_size"));
            assert!(span.is_none(), "inline sources carry no file metadata");
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Unknown top-level sections are rejected.
#[test]
fn unknown_top_level_section_rejected() {
    let result = load_config_from_str("[telegram]\nbot_token = \"x\"\n");
    assert!(result.is_err());
}

/// Wrong value types are reported as InvalidType.
#[test]
fn invalid_type_is_reported() {
    let errors = load_and_validate_str("[server]\nport = \"eighty\"\n").unwrap_err();
    assert!(
        matches!(&errors[0], ConfigError::InvalidType { key, .. } if key.contains("port")),
        "got: {errors:?}"
    );
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_runs_after_parse() {
    let errors =
        load_and_validate_str("[auth]\nalgorithm = \"RS256\"\n").unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| e.to_string().contains("auth.public_key_path")),
        "got: {errors:?}"
    );
}

/// A complete valid configuration passes load + validate.
#[test]
fn load_and_validate_accepts_valid_config() {
    let config = load_and_validate_str("[auth]\nsecret = \"x\"\n").unwrap();
    assert_eq!(config.auth.secret.as_deref(), Some("x"));
}

/// `BAZAAR_<SECTION>_<KEY>` env vars override file values, including keys with underscores.
#[test]
fn env_vars_override_file_values() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "custom.toml",
            "[gemini]\napi_key = \"from-file\"\n\n[server]\nport = 8001\n",
        )?;
        jail.set_env("BAZAAR_GEMINI_API_KEY", "from-env");
        jail.set_env("BAZAAR_MARKET_MAX_PAGE_SIZE", "42");

        let config: BazaarConfig = load_config_from_path(std::path::Path::new("custom.toml"))?;
        assert_eq!(config.gemini.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.market.max_page_size, 42);
        assert_eq!(config.server.port, 8001);
        Ok(())
    });
}

/// Missing config files are silently skipped.
#[test]
fn missing_file_yields_defaults() {
    figment::Jail::expect_with(|_jail| {
        let config = load_config_from_path(std::path::Path::new("/nonexistent/bazaar.toml"))?;
        assert_eq!(config.server.port, 8000);
        Ok(())
    });
}

/// Diagnostics render through miette.
#[test]
fn config_error_renders_with_miette() {
    let error = ConfigError::UnknownKey {
        key: "prot".to_string(),
        suggestion: Some("port".to_string()),
        valid_keys: "host, port, max_upload_bytes".to_string(),
        span: None,
        src: None,
    };

    let mut buf = String::new();
    miette::GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render");
    assert!(buf.contains("prot"));
    assert!(buf.contains("did you mean `port`"));
}
