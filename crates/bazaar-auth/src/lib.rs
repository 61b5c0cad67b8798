// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer identity token verification for the Bazaar marketplace.
//!
//! Tokens are JWTs issued by an external identity provider. The verifier
//! checks signature, expiry, and (when configured) issuer and audience, and
//! yields the token subject as the external identity.

pub mod verifier;

pub use verifier::JwtIdentityVerifier;
