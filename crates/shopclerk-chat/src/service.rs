// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The chat service: one entry point per request, wiring the full pipeline.
//!
//! A turn runs sequentially: context fetch, intent resolution, data fetch,
//! composition, then both turns are persisted. Requests are stateless; all
//! shared state lives in the stores.

use std::sync::Arc;

use serde::Serialize;
use shopclerk_core::{
    ClerkError, Conversation, ConversationStats, ConversationStore, ConversationSummary, Role,
    StoredMessage,
};
use shopclerk_intent::{IntentResolver, render_context};

use crate::composer::ResponseComposer;
use crate::conversations::ConversationManager;
use crate::orchestrator::DataOrchestrator;

/// Outcome of one chat turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatOutcome {
    pub response_text: String,
    pub kind: String,
    pub payload: Option<serde_json::Value>,
    pub conversation_id: String,
}

/// The assembled query-resolution pipeline.
pub struct ChatService {
    resolver: Arc<dyn IntentResolver>,
    orchestrator: DataOrchestrator,
    composer: ResponseComposer,
    conversations: ConversationManager,
    context_window_turns: i64,
}

impl ChatService {
    pub fn new(
        resolver: Arc<dyn IntentResolver>,
        orchestrator: DataOrchestrator,
        composer: ResponseComposer,
        conversation_store: Arc<dyn ConversationStore>,
        context_window_turns: i64,
    ) -> Self {
        Self {
            resolver,
            orchestrator,
            composer,
            conversations: ConversationManager::new(conversation_store),
            context_window_turns,
        }
    }

    /// Handle one chat turn.
    ///
    /// Without a `conversation_id` a new conversation is started for the
    /// user. Both the user message and the composed reply are persisted, the
    /// reply with its kind tag as metadata.
    pub async fn chat(
        &self,
        user_id: &str,
        conversation_id: Option<&str>,
        message: &str,
    ) -> Result<ChatOutcome, ClerkError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ClerkError::InvalidInput("no message provided".to_string()));
        }

        let conversation = match conversation_id {
            Some(id) => self
                .conversations
                .get_conversation(id)
                .await?
                .ok_or_else(|| ClerkError::not_found("conversation", id))?,
            None => self.conversations.create_conversation(user_id, None).await?,
        };

        // The window holds previous turns only; the current message is
        // persisted after composition.
        let window = self
            .conversations
            .recent_window(&conversation.id, self.context_window_turns)
            .await?;

        let intent = self.resolver.resolve(message, &window).await;
        tracing::debug!(kind = %intent.kind(), conversation_id = %conversation.id, "resolved intent");

        let data = self.orchestrator.fetch(&intent).await?;
        let context_summary = render_context(&window);
        let reply = self.composer.render(&data, message, &context_summary).await;

        self.conversations
            .add_message(&conversation.id, Role::User, message, None)
            .await?;
        self.conversations
            .add_message(
                &conversation.id,
                Role::Assistant,
                &reply.text,
                Some(serde_json::json!({"response_type": reply.kind})),
            )
            .await?;

        Ok(ChatOutcome {
            response_text: reply.text,
            kind: reply.kind,
            payload: reply.payload,
            conversation_id: conversation.id,
        })
    }

    /// Create a conversation explicitly (outside a chat turn).
    pub async fn create_conversation(
        &self,
        user_id: &str,
        title: Option<String>,
    ) -> Result<Conversation, ClerkError> {
        self.conversations.create_conversation(user_id, title).await
    }

    /// A user's conversations with last-message previews.
    pub async fn list_conversations(
        &self,
        user_id: &str,
        limit: i64,
        skip: i64,
    ) -> Result<Vec<ConversationSummary>, ClerkError> {
        self.conversations
            .list_conversations(user_id, limit, skip)
            .await
    }

    /// A conversation and a page of its messages.
    ///
    /// Fails with `NotFound` when the conversation does not exist, unlike
    /// order lookups where absence is an ordinary empty result.
    pub async fn get_messages(
        &self,
        conversation_id: &str,
        limit: i64,
        skip: i64,
    ) -> Result<(Conversation, Vec<StoredMessage>), ClerkError> {
        let conversation = self
            .conversations
            .get_conversation(conversation_id)
            .await?
            .ok_or_else(|| ClerkError::not_found("conversation", conversation_id))?;
        let messages = self
            .conversations
            .list_messages(conversation_id, limit, skip)
            .await?;
        Ok((conversation, messages))
    }

    /// Delete a conversation; `true` iff it existed.
    pub async fn delete_conversation(&self, id: &str) -> Result<bool, ClerkError> {
        self.conversations.delete_conversation(id).await
    }

    /// Aggregate statistics for a user.
    pub async fn statistics(&self, user_id: &str) -> Result<ConversationStats, ClerkError> {
        self.conversations.statistics(user_id).await
    }

    /// Store connectivity check.
    pub async fn health(&self) -> Result<(), ClerkError> {
        self.orchestrator.ping().await
    }

    /// Browse access to the catalog, passed through for the API surface.
    pub fn catalog(&self) -> &DataOrchestrator {
        &self.orchestrator
    }
}
