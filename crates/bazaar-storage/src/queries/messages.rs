// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Direct message operations.

use std::collections::HashMap;

use bazaar_core::BazaarError;
use bazaar_core::types::{Message, NewMessage};
use rusqlite::params;

use crate::database::Database;

const MESSAGE_SELECT: &str = "SELECT m.id, m.sender_id, m.receiver_id, m.content, m.listing_id,
        p.name, m.is_read, m.is_unsent, m.created_at
     FROM messages m
     LEFT JOIN listings p ON p.id = m.listing_id";

fn message_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(0)?,
        sender_id: row.get(1)?,
        receiver_id: row.get(2)?,
        content: row.get(3)?,
        product_id: row.get(4)?,
        product_name: row.get(5)?,
        is_read: row.get(6)?,
        is_unsent: row.get(7)?,
        created_at: row.get(8)?,
    })
}

/// Insert a message and return it as stored.
pub async fn insert_message(db: &Database, message: &NewMessage) -> Result<Message, BazaarError> {
    let message = message.clone();
    db.connection()
        .call(move |conn| -> Result<Message, rusqlite::Error> {
            conn.execute(
                "INSERT INTO messages (id, sender_id, receiver_id, content, listing_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    message.id,
                    message.sender_id,
                    message.receiver_id,
                    message.content,
                    message.product_id,
                ],
            )?;
            conn.query_row(
                &format!("{MESSAGE_SELECT} WHERE m.id = ?1"),
                params![message.id],
                message_from_row,
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Messages exchanged between two accounts in either direction, oldest first.
pub async fn get_thread(
    db: &Database,
    account_id: &str,
    partner_id: &str,
) -> Result<Vec<Message>, BazaarError> {
    let account_id = account_id.to_string();
    let partner_id = partner_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<Message>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "{MESSAGE_SELECT}
                 WHERE (m.sender_id = ?1 AND m.receiver_id = ?2)
                    OR (m.sender_id = ?2 AND m.receiver_id = ?1)
                 ORDER BY m.created_at ASC, m.id ASC"
            ))?;
            let rows = stmt.query_map(params![account_id, partner_id], message_from_row)?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Every message the account sent or received, newest first.
pub async fn messages_touching(db: &Database, account_id: &str) -> Result<Vec<Message>, BazaarError> {
    let account_id = account_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<Message>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "{MESSAGE_SELECT}
                 WHERE m.sender_id = ?1 OR m.receiver_id = ?1
                 ORDER BY m.created_at DESC, m.id DESC"
            ))?;
            let rows = stmt.query_map(params![account_id], message_from_row)?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Unread messages addressed to `account_id`, counted per sender.
pub async fn unread_counts(
    db: &Database,
    account_id: &str,
) -> Result<HashMap<String, i64>, BazaarError> {
    let account_id = account_id.to_string();
    db.connection()
        .call(move |conn| -> Result<HashMap<String, i64>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT sender_id, COUNT(*) FROM messages
                 WHERE receiver_id = ?1 AND is_read = 0
                 GROUP BY sender_id",
            )?;
            let rows = stmt.query_map(params![account_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Mark every message from `partner_id` to `account_id` as read.
pub async fn mark_read(db: &Database, account_id: &str, partner_id: &str) -> Result<u64, BazaarError> {
    let account_id = account_id.to_string();
    let partner_id = partner_id.to_string();
    db.connection()
        .call(move |conn| -> Result<u64, rusqlite::Error> {
            let changed = conn.execute(
                "UPDATE messages SET is_read = 1
                 WHERE receiver_id = ?1 AND sender_id = ?2 AND is_read = 0",
                params![account_id, partner_id],
            )?;
            Ok(changed as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Blank the content of a message sent by `sender_id` and flag it unsent.
pub async fn unsend_message(db: &Database, id: &str, sender_id: &str) -> Result<u64, BazaarError> {
    let id = id.to_string();
    let sender_id = sender_id.to_string();
    db.connection()
        .call(move |conn| -> Result<u64, rusqlite::Error> {
            let changed = conn.execute(
                "UPDATE messages SET content = '', is_unsent = 1
                 WHERE id = ?1 AND sender_id = ?2",
                params![id, sender_id],
            )?;
            Ok(changed as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn delete_message(db: &Database, id: &str, sender_id: &str) -> Result<u64, BazaarError> {
    let id = id.to_string();
    let sender_id = sender_id.to_string();
    db.connection()
        .call(move |conn| -> Result<u64, rusqlite::Error> {
            let changed = conn.execute(
                "DELETE FROM messages WHERE id = ?1 AND sender_id = ?2",
                params![id, sender_id],
            )?;
            Ok(changed as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
