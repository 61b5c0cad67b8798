// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image storage for listing photos and avatars.
//!
//! Objects are written under a root directory and handed out as
//! time-limited URLs signed with HMAC-SHA256. The gateway serves those URLs
//! after checking the signature with [`LocalMediaStore::verify`].

pub mod keys;
pub mod store;

pub use keys::{OPAQUE_CONTENT_TYPE, content_type_for, sanitize_key};
pub use store::LocalMediaStore;
