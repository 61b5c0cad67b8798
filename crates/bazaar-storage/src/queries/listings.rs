// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Listing operations and the filter/sort/paginate pipeline.
//!
//! Every listing view (search, per-seller, purchases, likes) goes through
//! [`query_listings`]; only the [`ListingScope`] differs.

use bazaar_core::BazaarError;
use bazaar_core::types::{
    Listing, ListingPage, ListingQuery, ListingScope, ListingUpdate, NewListing, SortOrder,
    StatusFilter,
};
use rusqlite::types::Value;
use rusqlite::{OptionalExtension, params, params_from_iter};

use crate::database::Database;

/// Columns selected for an enriched listing. The single `?` binds the viewer id.
const LISTING_SELECT: &str = "SELECT p.id, p.name, p.price, p.description, p.owner_id, u.name,
        p.image_url, p.buyer_id, b.name, p.created_at,
        (SELECT COUNT(*) FROM likes lc WHERE lc.listing_id = p.id) AS like_count,
        EXISTS(SELECT 1 FROM likes lv WHERE lv.listing_id = p.id AND lv.account_id = ?) AS is_liked";

const LISTING_JOINS: &str = "FROM listings p
     JOIN accounts u ON u.id = p.owner_id
     LEFT JOIN accounts b ON b.id = p.buyer_id";

fn listing_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Listing> {
    Ok(Listing {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        description: row.get(3)?,
        user_id: row.get(4)?,
        user_name: row.get(5)?,
        image_url: row.get(6)?,
        buyer_id: row.get(7)?,
        buyer_name: row.get(8)?,
        created_at: row.get(9)?,
        like_count: row.get(10)?,
        is_liked: row.get(11)?,
    })
}

/// Insert a new, unsold listing.
pub async fn insert_listing(db: &Database, listing: &NewListing) -> Result<(), BazaarError> {
    let listing = listing.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO listings (id, owner_id, name, price, description, image_url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    listing.id,
                    listing.owner_id,
                    listing.name,
                    listing.price,
                    listing.description,
                    listing.image_url,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get one enriched listing as seen by `viewer_id`.
pub async fn get_listing(
    db: &Database,
    id: &str,
    viewer_id: Option<&str>,
) -> Result<Option<Listing>, BazaarError> {
    let id = id.to_string();
    let viewer_id = viewer_id.map(str::to_string);
    db.connection()
        .call(move |conn| -> Result<Option<Listing>, rusqlite::Error> {
            conn.query_row(
                &format!("{LISTING_SELECT} {LISTING_JOINS} WHERE p.id = ?"),
                params![viewer_id, id],
                listing_from_row,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Owner of a listing, or `None` when the listing does not exist.
pub async fn listing_owner(db: &Database, id: &str) -> Result<Option<String>, BazaarError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
            conn.query_row(
                "SELECT owner_id FROM listings WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update owner-editable fields. Returns the number of rows matched.
pub async fn update_listing(
    db: &Database,
    id: &str,
    owner_id: &str,
    update: &ListingUpdate,
    unsold_only: bool,
) -> Result<u64, BazaarError> {
    let id = id.to_string();
    let owner_id = owner_id.to_string();
    let update = update.clone();
    db.connection()
        .call(move |conn| -> Result<u64, rusqlite::Error> {
            let mut sql = String::from(
                "UPDATE listings SET
                     name = ?1,
                     price = ?2,
                     description = ?3,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?4 AND owner_id = ?5",
            );
            if unsold_only {
                sql.push_str(" AND buyer_id IS NULL");
            }
            let changed = conn.execute(
                &sql,
                params![update.name, update.price, update.description, id, owner_id],
            )?;
            Ok(changed as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a listing owned by `owner_id`. Likes go with it; messages keep
/// their row and lose the association.
pub async fn delete_listing(db: &Database, id: &str, owner_id: &str) -> Result<u64, BazaarError> {
    let id = id.to_string();
    let owner_id = owner_id.to_string();
    db.connection()
        .call(move |conn| -> Result<u64, rusqlite::Error> {
            let changed = conn.execute(
                "DELETE FROM listings WHERE id = ?1 AND owner_id = ?2",
                params![id, owner_id],
            )?;
            Ok(changed as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Compare-and-set the buyer: succeeds only while the listing is unsold.
///
/// This single statement is what decides concurrent purchases. Exactly one
/// caller observes a changed row.
pub async fn assign_buyer(db: &Database, id: &str, buyer_id: &str) -> Result<bool, BazaarError> {
    let id = id.to_string();
    let buyer_id = buyer_id.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let changed = conn.execute(
                "UPDATE listings SET
                     buyer_id = ?1,
                     sold_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now'),
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2 AND buyer_id IS NULL",
                params![buyer_id, id],
            )?;
            Ok(changed == 1)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// The scope join, filter conditions, and their bound values.
struct Filter {
    join: &'static str,
    conditions: Vec<&'static str>,
    values: Vec<Value>,
}

impl Filter {
    fn from_query(query: &ListingQuery) -> Self {
        let mut filter = Filter {
            join: "",
            conditions: Vec::new(),
            values: Vec::new(),
        };

        match &query.scope {
            ListingScope::All => {}
            ListingScope::Seller(account_id) => {
                filter.conditions.push("p.owner_id = ?");
                filter.values.push(Value::Text(account_id.clone()));
            }
            ListingScope::Buyer(account_id) => {
                filter.conditions.push("p.buyer_id = ?");
                filter.values.push(Value::Text(account_id.clone()));
            }
            ListingScope::LikedBy(account_id) => {
                filter.join = "JOIN likes ls ON ls.listing_id = p.id AND ls.account_id = ?";
                filter.values.push(Value::Text(account_id.clone()));
            }
        }

        match query.status {
            Some(StatusFilter::Selling) => filter.conditions.push("p.buyer_id IS NULL"),
            Some(StatusFilter::Sold) => filter.conditions.push("p.buyer_id IS NOT NULL"),
            None => {}
        }

        if let Some(keyword) = query.keyword.as_deref().map(str::trim)
            && !keyword.is_empty()
        {
            filter.conditions.push("p.name LIKE ? ESCAPE '\\'");
            filter
                .values
                .push(Value::Text(super::contains_pattern(keyword)));
        }

        filter
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }
}

/// ORDER BY clause for a sort order. Ties fall back to newest first, then id.
fn order_clause(sort: SortOrder) -> &'static str {
    match sort {
        SortOrder::Newest => "ORDER BY p.created_at DESC, p.id DESC",
        SortOrder::Oldest => "ORDER BY p.created_at ASC, p.id ASC",
        SortOrder::PriceAsc => "ORDER BY p.price ASC, p.created_at DESC, p.id DESC",
        SortOrder::PriceDesc => "ORDER BY p.price DESC, p.created_at DESC, p.id DESC",
        SortOrder::Likes => "ORDER BY like_count DESC, p.created_at DESC, p.id DESC",
    }
}

/// Run the listing pipeline: scope, status and keyword filters, sort, page,
/// plus the total count under the same filter.
pub async fn query_listings(
    db: &Database,
    query: &ListingQuery,
) -> Result<ListingPage, BazaarError> {
    let filter = Filter::from_query(query);
    let order = order_clause(query.sort);
    let viewer = query.viewer_id.clone().map(Value::Text).unwrap_or(Value::Null);
    let pagination = query.pagination;

    db.connection()
        .call(move |conn| -> Result<ListingPage, rusqlite::Error> {
            let where_clause = filter.where_clause();

            let count_sql = format!(
                "SELECT COUNT(*) {LISTING_JOINS} {} {where_clause}",
                filter.join
            );
            let total: i64 = conn.query_row(
                &count_sql,
                params_from_iter(filter.values.iter()),
                |row| row.get(0),
            )?;

            let page_sql = format!(
                "{LISTING_SELECT} {LISTING_JOINS} {} {where_clause} {order} LIMIT ? OFFSET ?",
                filter.join
            );
            let mut values = Vec::with_capacity(filter.values.len() + 3);
            values.push(viewer);
            values.extend(filter.values.iter().cloned());
            values.push(Value::Integer(i64::from(pagination.limit)));
            values.push(Value::Integer(pagination.offset()));

            let mut stmt = conn.prepare(&page_sql)?;
            let products = stmt
                .query_map(params_from_iter(values.iter()), listing_from_row)?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(ListingPage {
                products,
                total,
                page: pagination.page,
                limit: pagination.limit,
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}
