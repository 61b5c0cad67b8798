// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock identity provider.
//!
//! `MockIdentity` accepts tokens of the form `test-token-<subject>` and
//! rejects everything else, so tests can act as any subject without
//! minting real tokens.

use async_trait::async_trait;

use bazaar_core::traits::{IdentityAdapter, PluginAdapter};
use bazaar_core::types::{AdapterType, ExternalIdentity, HealthStatus};
use bazaar_core::BazaarError;

const TOKEN_PREFIX: &str = "test-token-";

#[derive(Debug, Default)]
pub struct MockIdentity;

impl MockIdentity {
    pub fn new() -> Self {
        Self
    }

    /// The bearer token this provider maps to `subject`.
    pub fn token_for(subject: &str) -> String {
        format!("{TOKEN_PREFIX}{subject}")
    }

    /// The identity a token for `subject` verifies to.
    pub fn identity(subject: &str) -> ExternalIdentity {
        ExternalIdentity {
            subject: subject.to_string(),
            email: Some(format!("{subject}@example.test")),
        }
    }
}

#[async_trait]
impl PluginAdapter for MockIdentity {
    fn name(&self) -> &str {
        "mock-identity"
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
impl IdentityAdapter for MockIdentity {
    async fn verify(&self, token: &str) -> Result<ExternalIdentity, BazaarError> {
        match token.strip_prefix(TOKEN_PREFIX) {
            Some(subject) if !subject.is_empty() => Ok(Self::identity(subject)),
            _ => Err(BazaarError::Unauthenticated("unknown test token".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn verifies_only_test_tokens() {
        let identity = MockIdentity::new();
        let verified = identity.verify(&MockIdentity::token_for("alice")).await.unwrap();
        assert_eq!(verified.subject, "alice");
        assert!(identity.verify("test-token-").await.is_err());
        assert!(identity.verify("eyJhbGciOi").await.is_err());
    }
}
