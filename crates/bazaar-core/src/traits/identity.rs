// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity adapter trait for bearer credential verification.

use async_trait::async_trait;

use crate::error::BazaarError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ExternalIdentity;

/// Adapter that verifies an opaque bearer credential with the external
/// identity provider.
#[async_trait]
pub trait IdentityAdapter: PluginAdapter {
    /// Verifies the token and returns the identity it was issued for.
    ///
    /// Every rejection is reported as [`BazaarError::Unauthenticated`].
    async fn verify(&self, token: &str) -> Result<ExternalIdentity, BazaarError>;
}
