// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the marketplace store of record.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::BazaarError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    Account, Listing, ListingPage, ListingQuery, ListingUpdate, Message, NewListing, NewMessage,
    ProfileUpdate,
};

/// Adapter for the persistent store holding accounts, listings, likes, and messages.
///
/// Every request is served directly against the store; implementations hold
/// no cross-request cache. Operations that report "rows affected" return the
/// count so the logic layer can decide how to interpret zero.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), BazaarError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), BazaarError>;

    // --- Account operations ---

    /// Inserts an account for `external_id` or renames the existing one, then
    /// returns the stored row. `id` is only used on first insert.
    async fn upsert_account(
        &self,
        id: &str,
        external_id: &str,
        name: &str,
    ) -> Result<Account, BazaarError>;

    async fn get_account(&self, id: &str) -> Result<Option<Account>, BazaarError>;

    async fn get_account_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Account>, BazaarError>;

    /// Writes profile fields; returns `None` when the account does not exist.
    async fn update_profile(
        &self,
        id: &str,
        update: &ProfileUpdate,
    ) -> Result<Option<Account>, BazaarError>;

    /// Accounts whose display name contains `name`.
    async fn search_accounts(&self, name: &str, limit: u32) -> Result<Vec<Account>, BazaarError>;

    // --- Listing operations ---

    async fn insert_listing(&self, listing: &NewListing) -> Result<(), BazaarError>;

    /// Fetches one enriched listing, with `is_liked` computed for `viewer_id`.
    async fn get_listing(
        &self,
        id: &str,
        viewer_id: Option<&str>,
    ) -> Result<Option<Listing>, BazaarError>;

    /// Returns the owner of a listing, if the listing exists.
    async fn listing_owner(&self, id: &str) -> Result<Option<String>, BazaarError>;

    /// Updates owner-editable fields where `owner == owner_id`. With
    /// `unsold_only`, sold listings are left untouched.
    async fn update_listing(
        &self,
        id: &str,
        owner_id: &str,
        update: &ListingUpdate,
        unsold_only: bool,
    ) -> Result<u64, BazaarError>;

    /// Deletes the listing where `owner == owner_id`.
    async fn delete_listing(&self, id: &str, owner_id: &str) -> Result<u64, BazaarError>;

    /// Sets the buyer only if the listing is still unsold. Returns whether this
    /// call won.
    async fn assign_buyer(&self, id: &str, buyer_id: &str) -> Result<bool, BazaarError>;

    /// Runs the filter/sort/paginate pipeline and returns the page with its total.
    async fn query_listings(&self, query: &ListingQuery) -> Result<ListingPage, BazaarError>;

    // --- Like operations ---

    /// Adds a like. A duplicate like is a no-op.
    async fn add_like(&self, account_id: &str, listing_id: &str) -> Result<(), BazaarError>;

    async fn remove_like(&self, account_id: &str, listing_id: &str) -> Result<(), BazaarError>;

    async fn has_like(&self, account_id: &str, listing_id: &str) -> Result<bool, BazaarError>;

    /// Flips a like in one store operation and returns the resulting state.
    async fn toggle_like(&self, account_id: &str, listing_id: &str) -> Result<bool, BazaarError>;

    // --- Message operations ---

    async fn insert_message(&self, message: &NewMessage) -> Result<Message, BazaarError>;

    /// Messages between the two accounts in either direction, oldest first.
    async fn get_thread(
        &self,
        account_id: &str,
        partner_id: &str,
    ) -> Result<Vec<Message>, BazaarError>;

    /// Every message sent or received by the account, newest first.
    async fn messages_touching(&self, account_id: &str) -> Result<Vec<Message>, BazaarError>;

    /// Unread messages addressed to the account, counted per sender.
    async fn unread_counts(&self, account_id: &str) -> Result<HashMap<String, i64>, BazaarError>;

    /// Marks every message from `partner_id` to `account_id` as read.
    async fn mark_read(&self, account_id: &str, partner_id: &str) -> Result<u64, BazaarError>;

    /// Clears the content of a message sent by `sender_id` and flags it unsent.
    async fn unsend_message(&self, id: &str, sender_id: &str) -> Result<u64, BazaarError>;

    /// Hard-deletes a message sent by `sender_id`.
    async fn delete_message(&self, id: &str, sender_id: &str) -> Result<u64, BazaarError>;
}
