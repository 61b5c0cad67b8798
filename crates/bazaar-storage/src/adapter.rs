// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use bazaar_config::model::StorageConfig;
use bazaar_core::types::{
    Account, Listing, ListingPage, ListingQuery, ListingUpdate, Message, NewListing, NewMessage,
    ProfileUpdate,
};
use bazaar_core::{AdapterType, BazaarError, HealthStatus, PluginAdapter, StorageAdapter};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is opened on the first call to
/// [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    ///
    /// [`initialize`]: StorageAdapter::initialize
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, BazaarError> {
        self.db.get().ok_or_else(|| BazaarError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, BazaarError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BazaarError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), BazaarError> {
        let path = self.config.database_path.clone();
        let db = Database::open_with(&path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| BazaarError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), BazaarError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    // --- Account operations ---

    async fn upsert_account(
        &self,
        id: &str,
        external_id: &str,
        name: &str,
    ) -> Result<Account, BazaarError> {
        queries::accounts::upsert_account(self.db()?, id, external_id, name).await
    }

    async fn get_account(&self, id: &str) -> Result<Option<Account>, BazaarError> {
        queries::accounts::get_account(self.db()?, id).await
    }

    async fn get_account_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Account>, BazaarError> {
        queries::accounts::get_account_by_external_id(self.db()?, external_id).await
    }

    async fn update_profile(
        &self,
        id: &str,
        update: &ProfileUpdate,
    ) -> Result<Option<Account>, BazaarError> {
        queries::accounts::update_profile(self.db()?, id, update).await
    }

    async fn search_accounts(&self, name: &str, limit: u32) -> Result<Vec<Account>, BazaarError> {
        queries::accounts::search_accounts(self.db()?, name, limit).await
    }

    // --- Listing operations ---

    async fn insert_listing(&self, listing: &NewListing) -> Result<(), BazaarError> {
        queries::listings::insert_listing(self.db()?, listing).await
    }

    async fn get_listing(
        &self,
        id: &str,
        viewer_id: Option<&str>,
    ) -> Result<Option<Listing>, BazaarError> {
        queries::listings::get_listing(self.db()?, id, viewer_id).await
    }

    async fn listing_owner(&self, id: &str) -> Result<Option<String>, BazaarError> {
        queries::listings::listing_owner(self.db()?, id).await
    }

    async fn update_listing(
        &self,
        id: &str,
        owner_id: &str,
        update: &ListingUpdate,
        unsold_only: bool,
    ) -> Result<u64, BazaarError> {
        queries::listings::update_listing(self.db()?, id, owner_id, update, unsold_only).await
    }

    async fn delete_listing(&self, id: &str, owner_id: &str) -> Result<u64, BazaarError> {
        queries::listings::delete_listing(self.db()?, id, owner_id).await
    }

    async fn assign_buyer(&self, id: &str, buyer_id: &str) -> Result<bool, BazaarError> {
        queries::listings::assign_buyer(self.db()?, id, buyer_id).await
    }

    async fn query_listings(&self, query: &ListingQuery) -> Result<ListingPage, BazaarError> {
        queries::listings::query_listings(self.db()?, query).await
    }

    // --- Like operations ---

    async fn add_like(&self, account_id: &str, listing_id: &str) -> Result<(), BazaarError> {
        queries::likes::add_like(self.db()?, account_id, listing_id).await
    }

    async fn remove_like(&self, account_id: &str, listing_id: &str) -> Result<(), BazaarError> {
        queries::likes::remove_like(self.db()?, account_id, listing_id).await
    }

    async fn has_like(&self, account_id: &str, listing_id: &str) -> Result<bool, BazaarError> {
        queries::likes::has_like(self.db()?, account_id, listing_id).await
    }

    async fn toggle_like(&self, account_id: &str, listing_id: &str) -> Result<bool, BazaarError> {
        queries::likes::toggle_like(self.db()?, account_id, listing_id).await
    }

    // --- Message operations ---

    async fn insert_message(&self, message: &NewMessage) -> Result<Message, BazaarError> {
        queries::messages::insert_message(self.db()?, message).await
    }

    async fn get_thread(
        &self,
        account_id: &str,
        partner_id: &str,
    ) -> Result<Vec<Message>, BazaarError> {
        queries::messages::get_thread(self.db()?, account_id, partner_id).await
    }

    async fn messages_touching(&self, account_id: &str) -> Result<Vec<Message>, BazaarError> {
        queries::messages::messages_touching(self.db()?, account_id).await
    }

    async fn unread_counts(&self, account_id: &str) -> Result<HashMap<String, i64>, BazaarError> {
        queries::messages::unread_counts(self.db()?, account_id).await
    }

    async fn mark_read(&self, account_id: &str, partner_id: &str) -> Result<u64, BazaarError> {
        queries::messages::mark_read(self.db()?, account_id, partner_id).await
    }

    async fn unsend_message(&self, id: &str, sender_id: &str) -> Result<u64, BazaarError> {
        queries::messages::unsend_message(self.db()?, id, sender_id).await
    }

    async fn delete_message(&self, id: &str, sender_id: &str) -> Result<u64, BazaarError> {
        queries::messages::delete_message(self.db()?, id, sender_id).await
    }
}
