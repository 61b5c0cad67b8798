// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The listing pipeline behind search and every scoped listing view.
//!
//! Full search, a user's public listings, and the caller's selling,
//! purchased, and liked views all run the same filter/sort/paginate query
//! and the same enrichment; only the [`ListingScope`] differs.

use bazaar_core::BazaarError;
use bazaar_core::types::{
    ExternalIdentity, Listing, ListingPage, ListingQuery, ListingScope, Pagination, SortOrder,
    StatusFilter,
};
use futures::future::join_all;
use serde::Deserialize;
use tracing::debug;

use crate::Marketplace;

/// Raw listing query parameters.
///
/// Unknown `sort` and `status` values are ignored rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingFilter {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Which fixed scope a listing request runs under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingView {
    /// Every listing.
    All,
    /// Listings owned by the given account.
    ByUser(String),
    /// Listings the caller owns.
    MySelling,
    /// Listings the caller bought.
    MyPurchases,
    /// Listings the caller liked.
    MyLikes,
}

impl ListingView {
    fn requires_account(&self) -> bool {
        matches!(self, Self::MySelling | Self::MyPurchases | Self::MyLikes)
    }
}

impl Marketplace {
    /// Run the listing pipeline for `view` and return one enriched page.
    ///
    /// The `My*` views need a registered caller; the others accept any
    /// viewer, including anonymous ones.
    pub async fn browse(
        &self,
        viewer: Option<&ExternalIdentity>,
        view: ListingView,
        filter: &ListingFilter,
    ) -> Result<ListingPage, BazaarError> {
        let viewer_id = if view.requires_account() {
            let identity = viewer
                .ok_or_else(|| BazaarError::Unauthenticated("credential required".into()))?;
            Some(self.resolve_account(identity).await?.id)
        } else {
            self.viewer_id(viewer).await?
        };

        let scope = match (view, viewer_id.clone()) {
            (ListingView::All, _) => ListingScope::All,
            (ListingView::ByUser(id), _) => ListingScope::Seller(id),
            (ListingView::MySelling, Some(id)) => ListingScope::Seller(id),
            (ListingView::MyPurchases, Some(id)) => ListingScope::Buyer(id),
            (ListingView::MyLikes, Some(id)) => ListingScope::LikedBy(id),
            (_, None) => return Err(BazaarError::AccountNotFound),
        };

        let query = self.build_query(filter, scope, viewer_id);
        let page = self.storage.query_listings(&query).await?;
        debug!(
            scope = ?query.scope,
            sort = %query.sort,
            total = page.total,
            returned = page.products.len(),
            "listing query"
        );

        let products = join_all(page.products.into_iter().map(|l| self.enrich(l))).await;
        Ok(ListingPage { products, ..page })
    }

    fn build_query(
        &self,
        filter: &ListingFilter,
        scope: ListingScope,
        viewer_id: Option<String>,
    ) -> ListingQuery {
        let keyword = filter
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string);
        ListingQuery {
            keyword,
            status: StatusFilter::parse_lenient(filter.status.as_deref()),
            sort: SortOrder::parse_lenient(filter.sort.as_deref()),
            scope,
            viewer_id,
            pagination: Pagination::new(
                filter.page,
                filter.limit,
                self.config.default_page_size,
                self.config.max_page_size,
            ),
        }
    }

    /// Replace the stored image reference with a displayable URL.
    pub(crate) async fn enrich(&self, mut listing: Listing) -> Listing {
        listing.image_url = self.resolve_image(listing.image_url.take()).await;
        listing
    }
}
