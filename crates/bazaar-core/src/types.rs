// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the storage, logic, and gateway layers.
//!
//! Optional columns (buyer, image, bio) are `Option` at this boundary; the
//! storage layer converts SQL NULL to `None` and back.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of collaborator behind an adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Identity,
    Media,
    Description,
    Observability,
}

// --- Identity ---

/// A verified identity returned by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    /// Stable subject identifier issued by the provider.
    pub subject: String,
    /// Email claim, when the provider includes one.
    pub email: Option<String>,
}

// --- Accounts ---

/// An internal account record, keyed by the external identity it was upserted from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub external_id: String,
    pub name: String,
    pub bio: Option<String>,
    /// Stored avatar reference; replaced by a signed URL before leaving the service.
    pub image_url: Option<String>,
    pub created_at: String,
}

/// The public projection of an [`Account`], without the external identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicAccount {
    pub id: String,
    pub name: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub created_at: String,
}

impl From<Account> for PublicAccount {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            bio: account.bio,
            image_url: account.image_url,
            created_at: account.created_at,
        }
    }
}

/// Profile fields written by a profile update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub bio: Option<String>,
    /// New avatar reference. `None` keeps the current avatar.
    pub image_url: Option<String>,
}

// --- Listings ---

/// A product offered for sale, enriched with derived and per-viewer fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub description: String,
    /// Owning account id.
    pub user_id: String,
    /// Owning account display name.
    pub user_name: String,
    /// Stored image reference; replaced by a signed URL during enrichment.
    pub image_url: Option<String>,
    /// Buyer account id. `None` while the listing is unsold.
    pub buyer_id: Option<String>,
    pub buyer_name: Option<String>,
    pub created_at: String,
    pub like_count: i64,
    /// Whether the viewing account has liked this listing. Always false for anonymous viewers.
    pub is_liked: bool,
}

impl Listing {
    /// A listing is sold exactly when it has a buyer.
    pub fn is_sold(&self) -> bool {
        self.buyer_id.is_some()
    }
}

/// A listing row about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListing {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub price: i64,
    pub description: String,
    pub image_url: Option<String>,
}

/// Owner-editable listing attributes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListingUpdate {
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub description: String,
}

/// Fixed owner/buyer/liker constraint applied by the listing pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListingScope {
    /// Every listing.
    #[default]
    All,
    /// Listings owned by the account.
    Seller(String),
    /// Listings bought by the account.
    Buyer(String),
    /// Listings liked by the account.
    LikedBy(String),
}

/// Listing sort order. Unrecognized values fall back to [`SortOrder::Newest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
    Likes,
}

impl SortOrder {
    /// Parse a query-string value, treating anything unknown as the default order.
    pub fn parse_lenient(value: Option<&str>) -> Self {
        value
            .and_then(|v| Self::from_str(v.trim()).ok())
            .unwrap_or_default()
    }
}

/// Sold-state filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum StatusFilter {
    /// Listings without a buyer.
    Selling,
    /// Listings with a buyer.
    Sold,
}

impl StatusFilter {
    /// Parse a query-string value; unknown values mean "no filter".
    pub fn parse_lenient(value: Option<&str>) -> Option<Self> {
        value.and_then(|v| Self::from_str(v.trim()).ok())
    }
}

/// A clamped page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// One-based page number, never below 1.
    pub page: u32,
    /// Page size, within `1..=max`.
    pub limit: u32,
}

impl Pagination {
    /// Build a page request from raw query values.
    ///
    /// Pages below 1 become 1. A missing or non-positive limit becomes
    /// `default_limit`; a limit above `max_limit` is capped.
    pub fn new(page: Option<i64>, limit: Option<i64>, default_limit: u32, max_limit: u32) -> Self {
        let max_limit = max_limit.max(1);
        let page = page
            .filter(|p| *p >= 1)
            .map(|p| p.min(i64::from(u32::MAX)) as u32)
            .unwrap_or(1);
        let limit = match limit {
            Some(l) if l >= 1 => l.min(i64::from(max_limit)) as u32,
            _ => default_limit.clamp(1, max_limit),
        };
        Self { page, limit }
    }

    /// Number of rows skipped before this page.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 20 }
    }
}

/// Parameters of one run of the listing pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingQuery {
    /// Substring matched against the listing name. Empty means no filter.
    pub keyword: Option<String>,
    pub status: Option<StatusFilter>,
    pub sort: SortOrder,
    pub scope: ListingScope,
    /// Internal account id of the viewer, used for `is_liked`.
    pub viewer_id: Option<String>,
    pub pagination: Pagination,
}

/// One page of listings plus the total under the same filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingPage {
    pub products: Vec<Listing>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

// --- Messages ---

/// A direct message between two accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub product_id: Option<String>,
    /// Name of the associated listing, when it still exists.
    pub product_name: Option<String>,
    pub is_read: bool,
    pub is_unsent: bool,
    pub created_at: String,
}

/// A message row about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub product_id: Option<String>,
}

/// One entry of the conversation list: the latest message with a partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSummary {
    pub partner_id: String,
    pub partner_name: String,
    pub partner_image_url: Option<String>,
    pub last_message: String,
    pub last_time: String,
    /// Unread messages from the partner to the caller.
    pub unread_count: i64,
}

// --- Descriptions ---

/// Listing fields suggested from a product photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedListing {
    pub name: String,
    pub price: i64,
    pub keywords: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_order_parses_known_values() {
        assert_eq!(SortOrder::parse_lenient(Some("price_asc")), SortOrder::PriceAsc);
        assert_eq!(SortOrder::parse_lenient(Some("price_desc")), SortOrder::PriceDesc);
        assert_eq!(SortOrder::parse_lenient(Some("oldest")), SortOrder::Oldest);
        assert_eq!(SortOrder::parse_lenient(Some("likes")), SortOrder::Likes);
    }

    #[test]
    fn sort_order_defaults_to_newest() {
        assert_eq!(SortOrder::parse_lenient(None), SortOrder::Newest);
        assert_eq!(SortOrder::parse_lenient(Some("cheapest")), SortOrder::Newest);
        assert_eq!(SortOrder::parse_lenient(Some("")), SortOrder::Newest);
    }

    #[test]
    fn status_filter_ignores_unknown_values() {
        assert_eq!(StatusFilter::parse_lenient(Some("selling")), Some(StatusFilter::Selling));
        assert_eq!(StatusFilter::parse_lenient(Some("sold")), Some(StatusFilter::Sold));
        assert_eq!(StatusFilter::parse_lenient(Some("all")), None);
        assert_eq!(StatusFilter::parse_lenient(None), None);
    }

    #[test]
    fn pagination_defaults_and_floors() {
        let p = Pagination::new(None, None, 20, 100);
        assert_eq!(p, Pagination { page: 1, limit: 20 });
        assert_eq!(p.offset(), 0);

        let p = Pagination::new(Some(0), Some(-5), 20, 100);
        assert_eq!(p, Pagination { page: 1, limit: 20 });

        let p = Pagination::new(Some(3), Some(500), 20, 100);
        assert_eq!(p, Pagination { page: 3, limit: 100 });
        assert_eq!(p.offset(), 200);
    }

    #[test]
    fn public_account_drops_external_id() {
        let account = Account {
            id: "acc-1".into(),
            external_id: "ext-1".into(),
            name: "Alice".into(),
            bio: None,
            image_url: None,
            created_at: "2026-01-01T00:00:00.000Z".into(),
        };
        let public = PublicAccount::from(account);
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("external_id").is_none());
        assert_eq!(json["name"], "Alice");
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn pagination_always_in_bounds(
                page in proptest::option::of(any::<i64>()),
                limit in proptest::option::of(any::<i64>()),
                default_limit in 1u32..200,
                max_limit in 1u32..200,
            ) {
                let p = Pagination::new(page, limit, default_limit, max_limit);
                prop_assert!(p.page >= 1);
                prop_assert!(p.limit >= 1);
                prop_assert!(p.limit <= max_limit);
                prop_assert!(p.offset() >= 0);
            }
        }
    }
}
