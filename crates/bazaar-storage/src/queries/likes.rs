// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Like set operations. A like is the pair `(account_id, listing_id)`.

use bazaar_core::BazaarError;
use rusqlite::params;

use crate::database::Database;

/// Add a like. Liking twice is a no-op.
pub async fn add_like(db: &Database, account_id: &str, listing_id: &str) -> Result<(), BazaarError> {
    let account_id = account_id.to_string();
    let listing_id = listing_id.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT OR IGNORE INTO likes (account_id, listing_id) VALUES (?1, ?2)",
                params![account_id, listing_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Remove a like if present.
pub async fn remove_like(
    db: &Database,
    account_id: &str,
    listing_id: &str,
) -> Result<(), BazaarError> {
    let account_id = account_id.to_string();
    let listing_id = listing_id.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "DELETE FROM likes WHERE account_id = ?1 AND listing_id = ?2",
                params![account_id, listing_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn has_like(db: &Database, account_id: &str, listing_id: &str) -> Result<bool, BazaarError> {
    let account_id = account_id.to_string();
    let listing_id = listing_id.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM likes WHERE account_id = ?1 AND listing_id = ?2)",
                params![account_id, listing_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Remove the like if present, otherwise add it. Returns whether the pair
/// is liked afterwards.
///
/// Both statements run inside one closure on the writer connection, so
/// concurrent toggles of the same pair alternate.
pub async fn toggle_like(
    db: &Database,
    account_id: &str,
    listing_id: &str,
) -> Result<bool, BazaarError> {
    let account_id = account_id.to_string();
    let listing_id = listing_id.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let tx = conn.transaction()?;
            let removed = tx.execute(
                "DELETE FROM likes WHERE account_id = ?1 AND listing_id = ?2",
                params![account_id, listing_id],
            )?;
            if removed == 0 {
                tx.execute(
                    "INSERT INTO likes (account_id, listing_id) VALUES (?1, ?2)",
                    params![account_id, listing_id],
                )?;
            }
            tx.commit()?;
            Ok(removed == 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
