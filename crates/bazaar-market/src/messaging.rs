// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Direct messages between accounts.

use std::collections::HashSet;

use bazaar_core::BazaarError;
use bazaar_core::types::{ChatSummary, ExternalIdentity, Message, NewMessage};
use bazaar_prometheus::record_message_sent;
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::Marketplace;
use crate::validation;

/// Body of a send request.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessage {
    pub receiver_id: String,
    pub content: String,
    #[serde(default)]
    pub product_id: Option<String>,
}

impl Marketplace {
    pub async fn send_message(
        &self,
        caller: &ExternalIdentity,
        request: SendMessage,
    ) -> Result<Message, BazaarError> {
        let sender = self.resolve_account(caller).await?;
        let receiver_id = validation::required_id("receiver_id", &request.receiver_id)?;
        let content = validation::message_content(&request.content)?;

        if receiver_id == sender.id {
            return Err(BazaarError::BadRequest("cannot message yourself".into()));
        }
        if self.storage.get_account(&receiver_id).await?.is_none() {
            return Err(BazaarError::NotFound("receiver".into()));
        }
        let product_id = request
            .product_id
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        if let Some(product_id) = &product_id
            && self.storage.listing_owner(product_id).await?.is_none()
        {
            return Err(BazaarError::ListingNotFound);
        }

        let message = self
            .storage
            .insert_message(&NewMessage {
                id: Uuid::now_v7().to_string(),
                sender_id: sender.id,
                receiver_id,
                content,
                product_id,
            })
            .await?;
        record_message_sent();
        debug!(message_id = %message.id, "message sent");
        Ok(message)
    }

    /// Every message between the caller and `partner_id`, oldest first.
    pub async fn thread(
        &self,
        caller: &ExternalIdentity,
        partner_id: &str,
    ) -> Result<Vec<Message>, BazaarError> {
        let me = self.resolve_account(caller).await?;
        let partner_id = validation::required_id("user_id", partner_id)?;
        self.storage.get_thread(&me.id, &partner_id).await
    }

    /// One entry per conversation partner, most recent conversation first.
    pub async fn conversations(
        &self,
        caller: &ExternalIdentity,
    ) -> Result<Vec<ChatSummary>, BazaarError> {
        let me = self.resolve_account(caller).await?;
        let messages = self.storage.messages_touching(&me.id).await?;
        let unread = self.storage.unread_counts(&me.id).await?;

        let mut summaries = Vec::new();
        for (partner_id, latest) in latest_per_partner(&me.id, &messages) {
            let Some(partner) = self.storage.get_account(partner_id).await? else {
                continue;
            };
            summaries.push(ChatSummary {
                partner_id: partner.id,
                partner_name: partner.name,
                partner_image_url: self.resolve_image(partner.image_url).await,
                last_message: latest.content.clone(),
                last_time: latest.created_at.clone(),
                unread_count: unread.get(partner_id).copied().unwrap_or(0),
            });
        }
        Ok(summaries)
    }

    /// Mark everything `partner_id` sent the caller as read.
    pub async fn mark_read(
        &self,
        caller: &ExternalIdentity,
        partner_id: &str,
    ) -> Result<(), BazaarError> {
        let me = self.resolve_account(caller).await?;
        let partner_id = validation::required_id("partner_id", partner_id)?;
        let rows = self.storage.mark_read(&me.id, &partner_id).await?;
        debug!(partner_id = %partner_id, rows, "messages marked read");
        Ok(())
    }

    /// Withdraw a message the caller sent, keeping its place in the thread.
    pub async fn unsend_message(
        &self,
        caller: &ExternalIdentity,
        id: &str,
    ) -> Result<(), BazaarError> {
        let me = self.resolve_account(caller).await?;
        if self.storage.unsend_message(id, &me.id).await? == 0 {
            return Err(BazaarError::NotFound("message".into()));
        }
        info!(message_id = %id, "message unsent");
        Ok(())
    }

    pub async fn delete_message(
        &self,
        caller: &ExternalIdentity,
        id: &str,
    ) -> Result<(), BazaarError> {
        let me = self.resolve_account(caller).await?;
        if self.storage.delete_message(id, &me.id).await? == 0 {
            return Err(BazaarError::NotFound("message".into()));
        }
        info!(message_id = %id, "message deleted");
        Ok(())
    }
}

/// Reduce newest-first messages to the first one seen per partner.
fn latest_per_partner<'a>(me: &str, newest_first: &'a [Message]) -> Vec<(&'a str, &'a Message)> {
    let mut seen = HashSet::new();
    newest_first
        .iter()
        .filter_map(|m| {
            let partner = if m.sender_id == me {
                m.receiver_id.as_str()
            } else {
                m.sender_id.as_str()
            };
            seen.insert(partner).then_some((partner, m))
        })
        .collect()
}
