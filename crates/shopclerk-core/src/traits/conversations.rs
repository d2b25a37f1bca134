// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation store trait: persistence for conversations and messages.

use async_trait::async_trait;

use crate::error::ClerkError;
use crate::types::{Conversation, ConversationStats, ConversationSummary, Role, StoredMessage};

/// Persistence backend for conversations and their messages.
///
/// Implementations must make `append_message` atomic at the store level: the
/// message insert, the parent's `message_count` increment, and the
/// `last_activity` bump commit together or not at all. Sequence numbers are
/// assigned by the store inside that same transaction, so two concurrent
/// appends to one conversation can never tie.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Persist a freshly created conversation.
    async fn create_conversation(&self, conversation: &Conversation) -> Result<(), ClerkError>;

    /// Fetch a conversation by id.
    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, ClerkError>;

    /// Append a message, atomically updating the parent conversation.
    ///
    /// Fails with `NotFound` if the conversation does not exist.
    async fn append_message(
        &self,
        conversation_id: &str,
        role: Role,
        content: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<StoredMessage, ClerkError>;

    /// The most recent `max` messages of a conversation, oldest-first.
    ///
    /// This is a suffix of the full history, not a prefix: the window used
    /// for follow-up disambiguation must contain the latest turns.
    async fn recent_messages(
        &self,
        conversation_id: &str,
        max: i64,
    ) -> Result<Vec<StoredMessage>, ClerkError>;

    /// Paged message listing in insertion order.
    async fn list_messages(
        &self,
        conversation_id: &str,
        limit: i64,
        skip: i64,
    ) -> Result<Vec<StoredMessage>, ClerkError>;

    /// A user's conversations, most recently active first, each with its
    /// last message attached.
    async fn list_conversations(
        &self,
        user_id: &str,
        limit: i64,
        skip: i64,
    ) -> Result<Vec<ConversationSummary>, ClerkError>;

    /// Hard-delete a conversation and all its messages.
    ///
    /// Returns `true` iff a conversation existed and was removed.
    async fn delete_conversation(&self, id: &str) -> Result<bool, ClerkError>;

    /// Aggregate statistics over all of a user's conversations.
    async fn statistics(&self, user_id: &str) -> Result<ConversationStats, ClerkError>;
}
