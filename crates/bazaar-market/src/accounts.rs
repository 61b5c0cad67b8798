// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account registration, profiles, and identity resolution.

use bazaar_core::BazaarError;
use bazaar_core::types::{Account, ExternalIdentity, ProfileUpdate, PublicAccount};
use tracing::{debug, info};
use uuid::Uuid;

use crate::validation;
use crate::{ImageUpload, Marketplace};

/// Maximum number of accounts returned by a name search.
const ACCOUNT_SEARCH_LIMIT: u32 = 50;

/// Fields of a profile update form.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: String,
    pub bio: Option<String>,
    pub image: Option<ImageUpload>,
}

impl Marketplace {
    /// Create or rename the account bound to the caller's identity.
    pub async fn register(
        &self,
        caller: &ExternalIdentity,
        name: &str,
    ) -> Result<Account, BazaarError> {
        let name = validation::display_name(name)?;
        let id = Uuid::now_v7().to_string();
        let account = self
            .storage
            .upsert_account(&id, &caller.subject, &name)
            .await?;
        info!(account_id = %account.id, "account registered");
        Ok(self.with_resolved_avatar(account).await)
    }

    /// The caller's own account, including the external identity.
    pub async fn me(&self, caller: &ExternalIdentity) -> Result<Account, BazaarError> {
        let account = self.resolve_account(caller).await?;
        Ok(self.with_resolved_avatar(account).await)
    }

    /// Overwrite the caller's name and bio, optionally replacing the avatar.
    ///
    /// The avatar is uploaded before the row is written; an upload failure
    /// leaves the profile unchanged.
    pub async fn update_profile(
        &self,
        caller: &ExternalIdentity,
        form: ProfileForm,
    ) -> Result<Account, BazaarError> {
        let account = self.resolve_account(caller).await?;
        let name = validation::display_name(&form.name)?;
        let bio = validation::bio(form.bio.as_deref())?;

        let image_url = match form.image {
            Some(image) => {
                let key = format!(
                    "avatars/{}_{}",
                    account.id,
                    validation::sanitize_file_name(&image.file_name)
                );
                let content_type = image.mime_type().to_string();
                Some(self.media.upload(&key, image.bytes, &content_type).await?)
            }
            None => None,
        };

        let updated = self
            .storage
            .update_profile(
                &account.id,
                &ProfileUpdate {
                    name,
                    bio,
                    image_url,
                },
            )
            .await?
            .ok_or(BazaarError::AccountNotFound)?;
        info!(account_id = %updated.id, "profile updated");
        Ok(self.with_resolved_avatar(updated).await)
    }

    pub async fn public_profile(&self, id: &str) -> Result<PublicAccount, BazaarError> {
        let account = self
            .storage
            .get_account(id)
            .await?
            .ok_or(BazaarError::AccountNotFound)?;
        Ok(self.with_resolved_avatar(account).await.into())
    }

    /// Accounts whose display name contains `name`, ordered by name.
    pub async fn search_accounts(&self, name: &str) -> Result<Vec<PublicAccount>, BazaarError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BazaarError::BadRequest("name is required".into()));
        }
        let accounts = self
            .storage
            .search_accounts(name, ACCOUNT_SEARCH_LIMIT)
            .await?;
        debug!(query = %name, results = accounts.len(), "account search");

        let mut results = Vec::with_capacity(accounts.len());
        for account in accounts {
            results.push(self.with_resolved_avatar(account).await.into());
        }
        Ok(results)
    }

    /// The registered account behind a verified identity.
    pub async fn resolve_account(&self, caller: &ExternalIdentity) -> Result<Account, BazaarError> {
        self.storage
            .get_account_by_external_id(&caller.subject)
            .await?
            .ok_or(BazaarError::AccountNotFound)
    }

    /// Internal id of an optional viewer. Unregistered viewers count as anonymous.
    pub(crate) async fn viewer_id(
        &self,
        viewer: Option<&ExternalIdentity>,
    ) -> Result<Option<String>, BazaarError> {
        match viewer {
            Some(identity) => Ok(self
                .storage
                .get_account_by_external_id(&identity.subject)
                .await?
                .map(|a| a.id)),
            None => Ok(None),
        }
    }

    async fn with_resolved_avatar(&self, mut account: Account) -> Account {
        account.image_url = self.resolve_image(account.image_url.take()).await;
        account
    }
}
