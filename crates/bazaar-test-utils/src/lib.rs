// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Bazaar integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockIdentity`] - Identity provider accepting `test-token-<subject>`
//! - [`MockMedia`] - In-memory media store with injectable failures
//! - [`MockDescriber`] - Language model with pre-configured responses
//! - [`TestHarness`] - Temp SQLite storage wired into a [`bazaar_market::Marketplace`]

pub mod harness;
pub mod mock_describer;
pub mod mock_identity;
pub mod mock_media;

pub use harness::{MultipartBody, TestHarness};
pub use mock_describer::MockDescriber;
pub use mock_identity::MockIdentity;
pub use mock_media::MockMedia;
