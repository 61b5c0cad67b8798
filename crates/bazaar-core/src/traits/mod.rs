// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the marketplace's collaborators.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod description;
pub mod identity;
pub mod media;
pub mod storage;

pub use adapter::PluginAdapter;
pub use description::DescriptionAdapter;
pub use identity::IdentityAdapter;
pub use media::MediaAdapter;
pub use storage::StorageAdapter;
