// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account upsert, lookup, and profile operations.

use bazaar_core::BazaarError;
use bazaar_core::types::{Account, ProfileUpdate};
use rusqlite::{OptionalExtension, params};

use crate::database::Database;

const ACCOUNT_COLUMNS: &str = "id, external_id, name, bio, image_url, created_at";

fn account_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        external_id: row.get(1)?,
        name: row.get(2)?,
        bio: row.get(3)?,
        image_url: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Insert the account for `external_id`, or overwrite its name if it exists,
/// and return the stored row. Runs in one transaction.
pub async fn upsert_account(
    db: &Database,
    id: &str,
    external_id: &str,
    name: &str,
) -> Result<Account, BazaarError> {
    let id = id.to_string();
    let external_id = external_id.to_string();
    let name = name.to_string();
    db.connection()
        .call(move |conn| -> Result<Account, rusqlite::Error> {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO accounts (id, external_id, name) VALUES (?1, ?2, ?3)
                 ON CONFLICT(external_id) DO UPDATE SET
                     name = excluded.name,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                params![id, external_id, name],
            )?;
            let account = tx.query_row(
                &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE external_id = ?1"),
                params![external_id],
                account_from_row,
            )?;
            tx.commit()?;
            Ok(account)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get an account by internal id.
pub async fn get_account(db: &Database, id: &str) -> Result<Option<Account>, BazaarError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Account>, rusqlite::Error> {
            conn.query_row(
                &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?1"),
                params![id],
                account_from_row,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get an account by the external identity it was registered with.
pub async fn get_account_by_external_id(
    db: &Database,
    external_id: &str,
) -> Result<Option<Account>, BazaarError> {
    let external_id = external_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Account>, rusqlite::Error> {
            conn.query_row(
                &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE external_id = ?1"),
                params![external_id],
                account_from_row,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Overwrite name and bio, and the avatar when a new one is given.
pub async fn update_profile(
    db: &Database,
    id: &str,
    update: &ProfileUpdate,
) -> Result<Option<Account>, BazaarError> {
    let id = id.to_string();
    let update = update.clone();
    db.connection()
        .call(move |conn| -> Result<Option<Account>, rusqlite::Error> {
            let changed = conn.execute(
                "UPDATE accounts SET
                     name = ?1,
                     bio = ?2,
                     image_url = COALESCE(?3, image_url),
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?4",
                params![update.name, update.bio, update.image_url, id],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            conn.query_row(
                &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?1"),
                params![id],
                account_from_row,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Accounts whose display name contains `name`, ordered by name.
pub async fn search_accounts(
    db: &Database,
    name: &str,
    limit: u32,
) -> Result<Vec<Account>, BazaarError> {
    let pattern = super::contains_pattern(name);
    db.connection()
        .call(move |conn| -> Result<Vec<Account>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ACCOUNT_COLUMNS} FROM accounts
                 WHERE name LIKE ?1 ESCAPE '\\'
                 ORDER BY name ASC, id ASC
                 LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![pattern, limit], account_from_row)?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn upsert_inserts_then_renames() {
        let (db, _dir) = setup_db().await;

        let first = upsert_account(&db, "acc-1", "ext-1", "Alice").await.unwrap();
        assert_eq!(first.id, "acc-1");
        assert_eq!(first.name, "Alice");

        // A second registration keeps the original id and overwrites the name.
        let second = upsert_account(&db, "acc-ignored", "ext-1", "Alicia").await.unwrap();
        assert_eq!(second.id, "acc-1");
        assert_eq!(second.name, "Alicia");
        assert_eq!(second.created_at, first.created_at);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn lookups_by_both_keys() {
        let (db, _dir) = setup_db().await;
        upsert_account(&db, "acc-1", "ext-1", "Alice").await.unwrap();

        assert_eq!(get_account(&db, "acc-1").await.unwrap().unwrap().external_id, "ext-1");
        assert_eq!(
            get_account_by_external_id(&db, "ext-1").await.unwrap().unwrap().id,
            "acc-1"
        );
        assert!(get_account(&db, "nope").await.unwrap().is_none());
        assert!(get_account_by_external_id(&db, "nope").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_profile_keeps_avatar_when_not_replaced() {
        let (db, _dir) = setup_db().await;
        upsert_account(&db, "acc-1", "ext-1", "Alice").await.unwrap();

        let with_avatar = ProfileUpdate {
            name: "Alice".into(),
            bio: Some("collector".into()),
            image_url: Some("avatars/acc-1_me.png".into()),
        };
        let updated = update_profile(&db, "acc-1", &with_avatar).await.unwrap().unwrap();
        assert_eq!(updated.image_url.as_deref(), Some("avatars/acc-1_me.png"));

        let without_avatar = ProfileUpdate {
            name: "Alice B".into(),
            bio: None,
            image_url: None,
        };
        let updated = update_profile(&db, "acc-1", &without_avatar).await.unwrap().unwrap();
        assert_eq!(updated.name, "Alice B");
        assert_eq!(updated.bio, None);
        assert_eq!(updated.image_url.as_deref(), Some("avatars/acc-1_me.png"));

        assert!(update_profile(&db, "ghost", &without_avatar).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn search_matches_substrings_literally() {
        let (db, _dir) = setup_db().await;
        upsert_account(&db, "a1", "e1", "Bob Smith").await.unwrap();
        upsert_account(&db, "a2", "e2", "Alice Smithers").await.unwrap();
        upsert_account(&db, "a3", "e3", "Carol").await.unwrap();
        upsert_account(&db, "a4", "e4", "100% Dave").await.unwrap();

        let found = search_accounts(&db, "Smith", 10).await.unwrap();
        let names: Vec<_> = found.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Alice Smithers", "Bob Smith"]);

        let found = search_accounts(&db, "%", 10).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "100% Dave");

        let limited = search_accounts(&db, "", 2).await.unwrap();
        assert_eq!(limited.len(), 2);
        db.close().await.unwrap();
    }
}
