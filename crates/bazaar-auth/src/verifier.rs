// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JWT identity verifier implementing [`IdentityAdapter`].

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use tracing::debug;

use bazaar_config::model::AuthConfig;
use bazaar_core::types::ExternalIdentity;
use bazaar_core::{AdapterType, BazaarError, HealthStatus, IdentityAdapter, PluginAdapter};

/// Claims read from a verified token. `exp` is checked by the validator.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

/// Verifies ID tokens signed with a shared secret (HS256) or an RSA key (RS256).
pub struct JwtIdentityVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtIdentityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIdentityVerifier")
            .field("algorithms", &self.validation.algorithms)
            .field("key", &"[redacted]")
            .finish()
    }
}

impl JwtIdentityVerifier {
    /// Build a verifier from the `[auth]` config section.
    ///
    /// Reads the RS256 public key from disk. Fails with [`BazaarError::Config`]
    /// when the key material is missing or unreadable.
    pub fn from_config(config: &AuthConfig) -> Result<Self, BazaarError> {
        let (algorithm, key) = match config.algorithm.as_str() {
            "HS256" => {
                let secret = config.secret.as_deref().ok_or_else(|| {
                    BazaarError::Config("auth.secret is required for HS256".into())
                })?;
                (Algorithm::HS256, DecodingKey::from_secret(secret.as_bytes()))
            }
            "RS256" => {
                let path = config.public_key_path.as_deref().ok_or_else(|| {
                    BazaarError::Config("auth.public_key_path is required for RS256".into())
                })?;
                let pem = std::fs::read(path).map_err(|e| {
                    BazaarError::Config(format!("cannot read auth.public_key_path {path}: {e}"))
                })?;
                let key = DecodingKey::from_rsa_pem(&pem)
                    .map_err(|e| BazaarError::Config(format!("invalid RSA public key: {e}")))?;
                (Algorithm::RS256, key)
            }
            other => {
                return Err(BazaarError::Config(format!(
                    "unsupported auth.algorithm: {other}"
                )));
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = config.leeway_secs;
        validation.validate_exp = true;
        let mut required = vec!["exp", "sub"];
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
            required.push("iss");
        }
        match &config.audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                required.push("aud");
            }
            None => validation.validate_aud = false,
        }
        validation.set_required_spec_claims(&required);

        Ok(Self { key, validation })
    }
}

#[async_trait]
impl PluginAdapter for JwtIdentityVerifier {
    fn name(&self) -> &str {
        "jwt"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Identity
    }

    async fn health_check(&self) -> Result<HealthStatus, BazaarError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BazaarError> {
        Ok(())
    }
}

#[async_trait]
impl IdentityAdapter for JwtIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<ExternalIdentity, BazaarError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            debug!(error = %e, "identity token rejected");
            BazaarError::Unauthenticated("invalid token".into())
        })?;

        if data.claims.sub.trim().is_empty() {
            return Err(BazaarError::Unauthenticated("token has no subject".into()));
        }

        Ok(ExternalIdentity {
            subject: data.claims.sub,
            email: data.claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode, get_current_timestamp};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims<'a> {
        sub: &'a str,
        exp: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        iss: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        aud: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        email: Option<&'a str>,
    }

    fn hs256_config() -> AuthConfig {
        AuthConfig {
            secret: Some("test-secret".into()),
            leeway_secs: 0,
            ..AuthConfig::default()
        }
    }

    fn sign(claims: &TestClaims<'_>, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(sub: &str) -> TestClaims<'_> {
        TestClaims {
            sub,
            exp: get_current_timestamp() + 600,
            iss: None,
            aud: None,
            email: None,
        }
    }

    #[tokio::test]
    async fn valid_token_yields_subject() {
        let verifier = JwtIdentityVerifier::from_config(&hs256_config()).unwrap();
        let mut c = claims("firebase-uid-1");
        c.email = Some("a@example.com");
        let identity = verifier.verify(&sign(&c, "test-secret")).await.unwrap();
        assert_eq!(identity.subject, "firebase-uid-1");
        assert_eq!(identity.email.as_deref(), Some("a@example.com"));
    }

    #[tokio::test]
    async fn every_rejection_is_unauthenticated() {
        let verifier = JwtIdentityVerifier::from_config(&hs256_config()).unwrap();

        let wrong_secret = sign(&claims("u1"), "other-secret");
        let mut expired = claims("u1");
        expired.exp = get_current_timestamp() - 3600;
        let expired = sign(&expired, "test-secret");
        let empty_subject = sign(&claims(""), "test-secret");
        let no_expiry = encode(
            &Header::default(),
            &serde_json::json!({ "sub": "u1" }),
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        for token in [
            wrong_secret.as_str(),
            expired.as_str(),
            empty_subject.as_str(),
            no_expiry.as_str(),
            "garbage",
            "",
        ] {
            let err = verifier.verify(token).await.unwrap_err();
            assert!(
                matches!(err, BazaarError::Unauthenticated(_)),
                "token {token:?} gave {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn issuer_and_audience_are_checked_when_configured() {
        let mut config = hs256_config();
        config.issuer = Some("https://issuer.example".into());
        config.audience = Some("bazaar".into());
        let verifier = JwtIdentityVerifier::from_config(&config).unwrap();

        let mut good = claims("u1");
        good.iss = Some("https://issuer.example");
        good.aud = Some("bazaar");
        assert!(verifier.verify(&sign(&good, "test-secret")).await.is_ok());

        let mut wrong_aud = claims("u1");
        wrong_aud.iss = Some("https://issuer.example");
        wrong_aud.aud = Some("someone-else");
        assert!(verifier.verify(&sign(&wrong_aud, "test-secret")).await.is_err());

        let missing_iss = claims("u1");
        assert!(verifier.verify(&sign(&missing_iss, "test-secret")).await.is_err());
    }

    #[tokio::test]
    async fn audience_claim_is_ignored_when_unconfigured() {
        let verifier = JwtIdentityVerifier::from_config(&hs256_config()).unwrap();
        let mut c = claims("u1");
        c.aud = Some("anything");
        assert!(verifier.verify(&sign(&c, "test-secret")).await.is_ok());
    }

    #[test]
    fn config_errors() {
        let no_secret = AuthConfig::default();
        assert!(matches!(
            JwtIdentityVerifier::from_config(&no_secret),
            Err(BazaarError::Config(_))
        ));

        let missing_pem = AuthConfig {
            algorithm: "RS256".into(),
            public_key_path: Some("/nonexistent/key.pem".into()),
            ..AuthConfig::default()
        };
        assert!(matches!(
            JwtIdentityVerifier::from_config(&missing_pem),
            Err(BazaarError::Config(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        let bad_pem = dir.path().join("key.pem");
        std::fs::write(&bad_pem, "not a key").unwrap();
        let bad = AuthConfig {
            algorithm: "RS256".into(),
            public_key_path: Some(bad_pem.display().to_string()),
            ..AuthConfig::default()
        };
        assert!(JwtIdentityVerifier::from_config(&bad).is_err());

        let unknown = AuthConfig {
            algorithm: "ES256".into(),
            ..hs256_config()
        };
        assert!(JwtIdentityVerifier::from_config(&unknown).is_err());
    }

    #[test]
    fn debug_redacts_key() {
        let verifier = JwtIdentityVerifier::from_config(&hs256_config()).unwrap();
        let debug = format!("{verifier:?}");
        assert!(!debug.contains("test-secret"));
        assert!(debug.contains("[redacted]"));
    }
}
