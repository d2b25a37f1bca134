// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message operations.
//!
//! `append_message` is the only write path for messages: it bumps the parent
//! conversation's `message_count` and `last_activity`, takes the new count as
//! the message's sequence number, and inserts the row, all in one
//! transaction. Sequence numbers are therefore gapless, 1-based, and strictly
//! increasing per conversation.

use rusqlite::params;
use shopclerk_core::{ClerkError, Role, StoredMessage};

use crate::database::Database;
use crate::queries::now_iso;

const MESSAGE_COLUMNS: &str = "id, conversation_id, seq, role, content, metadata, created_at";

fn message_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredMessage> {
    Ok(StoredMessage {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        seq: row.get(2)?,
        role: row.get(3)?,
        content: row.get(4)?,
        metadata: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Append a message to a conversation, atomically updating the parent.
///
/// Returns `NotFound` without inserting anything if the conversation does
/// not exist.
pub async fn append_message(
    db: &Database,
    conversation_id: &str,
    role: Role,
    content: &str,
    metadata: Option<serde_json::Value>,
) -> Result<StoredMessage, ClerkError> {
    let conversation_id = conversation_id.to_string();
    let id = uuid::Uuid::new_v4().to_string();
    let role = role.to_string();
    let content = content.to_string();
    let metadata = metadata.map(|v| v.to_string());
    let created_at = now_iso();
    let conv_id_for_err = conversation_id.clone();

    let inserted = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            // The RETURNING clause gives us the post-increment count, which
            // doubles as the new message's sequence number. Zero rows means
            // the conversation does not exist; the transaction rolls back on
            // drop without committing.
            let seq: i64 = match tx.query_row(
                "UPDATE conversations
                 SET message_count = message_count + 1, last_activity = ?1
                 WHERE id = ?2
                 RETURNING message_count",
                params![created_at, conversation_id],
                |row| row.get(0),
            ) {
                Ok(seq) => seq,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(e.into()),
            };

            tx.execute(
                "INSERT INTO messages (id, conversation_id, seq, role, content, metadata, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![id, conversation_id, seq, role, content, metadata, created_at],
            )?;
            tx.commit()?;

            Ok(Some(StoredMessage {
                id,
                conversation_id,
                seq,
                role,
                content,
                metadata,
                created_at,
            }))
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    inserted.ok_or_else(|| ClerkError::not_found("conversation", conv_id_for_err))
}

/// The most recent `max` messages of a conversation, oldest-first.
pub async fn recent_messages(
    db: &Database,
    conversation_id: &str,
    max: i64,
) -> Result<Vec<StoredMessage>, ClerkError> {
    let conversation_id = conversation_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages
                 WHERE conversation_id = ?1
                 ORDER BY seq DESC LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![conversation_id, max], message_from_row)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            // Fetched newest-first to take the suffix; callers want
            // chronological order.
            messages.reverse();
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Paged message listing in insertion order.
pub async fn list_messages(
    db: &Database,
    conversation_id: &str,
    limit: i64,
    skip: i64,
) -> Result<Vec<StoredMessage>, ClerkError> {
    let conversation_id = conversation_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages
                 WHERE conversation_id = ?1
                 ORDER BY seq ASC LIMIT ?2 OFFSET ?3"
            ))?;
            let rows = stmt.query_map(params![conversation_id, limit, skip], message_from_row)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
