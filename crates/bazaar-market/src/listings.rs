// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Listing lifecycle: create, update, delete, detail, purchase, and likes.

use bazaar_core::BazaarError;
use bazaar_core::types::{ExternalIdentity, Listing, ListingUpdate, NewListing};
use bazaar_prometheus::{PurchaseOutcome, record_like_toggled, record_listing_created, record_purchase};
use tracing::{debug, info};
use uuid::Uuid;

use crate::validation;
use crate::{ImageUpload, Marketplace};

/// Fields of a listing creation form.
#[derive(Debug, Clone)]
pub struct ListingForm {
    pub name: String,
    pub price: i64,
    pub description: String,
}

impl Marketplace {
    /// Create a listing owned by the caller.
    ///
    /// The image, when present, is stored before the row is inserted, so a
    /// failed upload leaves nothing behind.
    pub async fn create_listing(
        &self,
        caller: &ExternalIdentity,
        form: ListingForm,
        image: Option<ImageUpload>,
    ) -> Result<Listing, BazaarError> {
        let owner = self.resolve_account(caller).await?;
        let (name, price, description) =
            validation::listing_fields(&form.name, form.price, &form.description)?;
        let id = Uuid::now_v7().to_string();

        let image_url = match image {
            Some(image) => {
                let key = format!(
                    "products/{id}_{}",
                    validation::sanitize_file_name(&image.file_name)
                );
                let content_type = image.mime_type().to_string();
                Some(self.media.upload(&key, image.bytes, &content_type).await?)
            }
            None => None,
        };

        self.storage
            .insert_listing(&NewListing {
                id: id.clone(),
                owner_id: owner.id.clone(),
                name,
                price,
                description,
                image_url,
            })
            .await?;
        record_listing_created();
        info!(listing_id = %id, owner_id = %owner.id, "listing created");

        self.fetch_listing(&id, Some(&owner.id)).await
    }

    /// Overwrite name, price, and description of a listing the caller owns.
    ///
    /// When edits after sale are disabled, updating a sold listing fails
    /// with [`BazaarError::Conflict`].
    pub async fn update_listing(
        &self,
        caller: &ExternalIdentity,
        id: &str,
        update: ListingUpdate,
    ) -> Result<Listing, BazaarError> {
        let owner = self.resolve_account(caller).await?;
        let (name, price, description) =
            validation::listing_fields(&update.name, update.price, &update.description)?;
        let update = ListingUpdate {
            name,
            price,
            description,
        };
        let unsold_only = !self.config.allow_edit_after_sale;

        let rows = self
            .storage
            .update_listing(id, &owner.id, &update, unsold_only)
            .await?;
        if rows == 0 {
            match self.storage.listing_owner(id).await? {
                None => return Err(BazaarError::ListingNotFound),
                Some(actual) if actual != owner.id => {
                    return Err(BazaarError::Forbidden("listing is owned by another account".into()));
                }
                Some(_) if unsold_only => {
                    return Err(BazaarError::Conflict("listing already sold".into()));
                }
                Some(_) => {}
            }
        }
        info!(listing_id = %id, "listing updated");

        self.fetch_listing(id, Some(&owner.id)).await
    }

    /// Delete a listing the caller owns. Its likes go with it.
    pub async fn delete_listing(
        &self,
        caller: &ExternalIdentity,
        id: &str,
    ) -> Result<(), BazaarError> {
        let owner = self.resolve_account(caller).await?;
        let rows = self.storage.delete_listing(id, &owner.id).await?;
        if rows == 0 {
            return Err(BazaarError::NotFound("listing".into()));
        }
        info!(listing_id = %id, "listing deleted");
        Ok(())
    }

    /// One enriched listing as seen by `viewer`.
    pub async fn get_listing(
        &self,
        viewer: Option<&ExternalIdentity>,
        id: &str,
    ) -> Result<Listing, BazaarError> {
        let viewer_id = self.viewer_id(viewer).await?;
        self.fetch_listing(id, viewer_id.as_deref()).await
    }

    /// Buy a listing.
    ///
    /// The checks before the conditional write only produce better errors;
    /// the write itself decides which concurrent buyer wins.
    pub async fn purchase(&self, caller: &ExternalIdentity, id: &str) -> Result<(), BazaarError> {
        let buyer = self.resolve_account(caller).await?;
        let listing = self
            .storage
            .get_listing(id, None)
            .await?
            .ok_or(BazaarError::ListingNotFound)?;

        if listing.user_id == buyer.id {
            record_purchase(PurchaseOutcome::SelfPurchase);
            return Err(BazaarError::SelfPurchase);
        }
        if listing.is_sold() {
            record_purchase(PurchaseOutcome::AlreadySold);
            return Err(BazaarError::AlreadySold);
        }

        if !self.storage.assign_buyer(id, &buyer.id).await? {
            // Deleted between the read and the write, or lost the race.
            if self.storage.listing_owner(id).await?.is_none() {
                return Err(BazaarError::ListingNotFound);
            }
            record_purchase(PurchaseOutcome::AlreadySold);
            debug!(listing_id = %id, buyer_id = %buyer.id, "purchase lost race");
            return Err(BazaarError::AlreadySold);
        }

        record_purchase(PurchaseOutcome::Success);
        info!(listing_id = %id, buyer_id = %buyer.id, "listing purchased");
        Ok(())
    }

    /// Flip the caller's like on a listing and return the new state.
    pub async fn toggle_like(
        &self,
        caller: &ExternalIdentity,
        listing_id: &str,
    ) -> Result<bool, BazaarError> {
        let account = self.resolve_account(caller).await?;
        if self.storage.listing_owner(listing_id).await?.is_none() {
            return Err(BazaarError::ListingNotFound);
        }

        let liked = self.storage.toggle_like(&account.id, listing_id).await?;
        record_like_toggled(liked);
        debug!(listing_id = %listing_id, account_id = %account.id, liked, "like toggled");
        Ok(liked)
    }

    /// Whether the caller likes a listing. Unregistered callers like nothing.
    pub async fn like_status(
        &self,
        caller: &ExternalIdentity,
        listing_id: &str,
    ) -> Result<bool, BazaarError> {
        match self.viewer_id(Some(caller)).await? {
            Some(account_id) => self.storage.has_like(&account_id, listing_id).await,
            None => Ok(false),
        }
    }

    async fn fetch_listing(
        &self,
        id: &str,
        viewer_id: Option<&str>,
    ) -> Result<Listing, BazaarError> {
        let listing = self
            .storage
            .get_listing(id, viewer_id)
            .await?
            .ok_or(BazaarError::ListingNotFound)?;
        Ok(self.enrich(listing).await)
    }
}
