// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation CRUD and aggregation operations.

use rusqlite::params;
use shopclerk_core::{
    ClerkError, Conversation, ConversationStats, ConversationSummary, types::MessagePreview,
};

use crate::database::Database;

const CONVERSATION_COLUMNS: &str =
    "id, user_id, title, status, created_at, last_activity, message_count";

fn conversation_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Conversation> {
    Ok(Conversation {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        status: row.get(3)?,
        created_at: row.get(4)?,
        last_activity: row.get(5)?,
        message_count: row.get(6)?,
    })
}

/// Insert a new conversation.
pub async fn create_conversation(
    db: &Database,
    conversation: &Conversation,
) -> Result<(), ClerkError> {
    let c = conversation.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO conversations
                   (id, user_id, title, status, created_at, last_activity, message_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    c.id,
                    c.user_id,
                    c.title,
                    c.status,
                    c.created_at,
                    c.last_activity,
                    c.message_count,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch a conversation by id.
pub async fn get_conversation(
    db: &Database,
    id: &str,
) -> Result<Option<Conversation>, ClerkError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            match conn.query_row(
                &format!("SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = ?1"),
                params![id],
                conversation_from_row,
            ) {
                Ok(c) => Ok(Some(c)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// A user's conversations, most recently active first, each with a preview
/// of its last message.
pub async fn list_conversations(
    db: &Database,
    user_id: &str,
    limit: i64,
    skip: i64,
) -> Result<Vec<ConversationSummary>, ClerkError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CONVERSATION_COLUMNS} FROM conversations
                 WHERE user_id = ?1
                 ORDER BY last_activity DESC, id ASC
                 LIMIT ?2 OFFSET ?3"
            ))?;
            let rows = stmt.query_map(params![user_id, limit, skip], conversation_from_row)?;
            let mut conversations = Vec::new();
            for row in rows {
                conversations.push(row?);
            }

            let mut last_stmt = conn.prepare(
                "SELECT role, content, created_at FROM messages
                 WHERE conversation_id = ?1
                 ORDER BY seq DESC LIMIT 1",
            )?;
            let mut summaries = Vec::with_capacity(conversations.len());
            for conversation in conversations {
                let last_message = match last_stmt.query_row(params![conversation.id], |row| {
                    Ok(MessagePreview {
                        role: row.get(0)?,
                        content: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                }) {
                    Ok(preview) => Some(preview),
                    Err(rusqlite::Error::QueryReturnedNoRows) => None,
                    Err(e) => return Err(e.into()),
                };
                summaries.push(ConversationSummary {
                    conversation,
                    last_message,
                });
            }
            Ok(summaries)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Hard-delete a conversation and all its messages.
///
/// Returns `true` iff a conversation row was removed.
pub async fn delete_conversation(db: &Database, id: &str) -> Result<bool, ClerkError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            // Messages carry ON DELETE CASCADE, but deleting explicitly keeps
            // the behavior independent of the foreign_keys pragma.
            tx.execute("DELETE FROM messages WHERE conversation_id = ?1", params![id])?;
            let removed = tx.execute("DELETE FROM conversations WHERE id = ?1", params![id])?;
            tx.commit()?;
            Ok(removed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Aggregate statistics over all of a user's conversations.
pub async fn statistics(db: &Database, user_id: &str) -> Result<ConversationStats, ClerkError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let stats = conn.query_row(
                "SELECT COUNT(*),
                        COALESCE(SUM(message_count), 0),
                        MIN(created_at),
                        MAX(last_activity)
                 FROM conversations WHERE user_id = ?1",
                params![user_id],
                |row| {
                    let total_conversations: i64 = row.get(0)?;
                    let total_messages: i64 = row.get(1)?;
                    let avg = if total_conversations > 0 {
                        total_messages as f64 / total_conversations as f64
                    } else {
                        0.0
                    };
                    Ok(ConversationStats {
                        total_conversations,
                        total_messages,
                        avg_messages_per_conversation: avg,
                        first_conversation_at: row.get(2)?,
                        last_conversation_at: row.get(3)?,
                    })
                },
            )?;
            Ok(stats)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
