// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation lifecycle management on top of the conversation store.

use std::sync::Arc;

use shopclerk_core::{
    ClerkError, Conversation, ConversationStats, ConversationStore, ConversationSummary, Role,
    StoredMessage,
};

/// Longest last-message preview returned by conversation listings.
const PREVIEW_MAX_CHARS: usize = 100;

/// Creates, lists, and mutates conversations; assigns ids and default titles.
pub struct ConversationManager {
    store: Arc<dyn ConversationStore>,
}

impl ConversationManager {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    /// Create a new conversation, generating an id and a timestamped default
    /// title when none is supplied.
    pub async fn create_conversation(
        &self,
        user_id: &str,
        title: Option<String>,
    ) -> Result<Conversation, ClerkError> {
        let now = chrono::Utc::now();
        let title =
            title.unwrap_or_else(|| format!("Conversation {}", now.format("%Y-%m-%d %H:%M")));
        let timestamp = now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
        let conversation = Conversation {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title,
            status: "active".to_string(),
            created_at: timestamp.clone(),
            last_activity: timestamp,
            message_count: 0,
        };
        self.store.create_conversation(&conversation).await?;
        tracing::debug!(conversation_id = %conversation.id, user_id, "conversation created");
        Ok(conversation)
    }

    pub async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, ClerkError> {
        self.store.get_conversation(id).await
    }

    /// Append a message; the store bumps the parent atomically.
    pub async fn add_message(
        &self,
        conversation_id: &str,
        role: Role,
        content: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<StoredMessage, ClerkError> {
        self.store
            .append_message(conversation_id, role, content, metadata)
            .await
    }

    /// The most recent `max_turns` messages, oldest-first.
    pub async fn recent_window(
        &self,
        conversation_id: &str,
        max_turns: i64,
    ) -> Result<Vec<StoredMessage>, ClerkError> {
        self.store.recent_messages(conversation_id, max_turns).await
    }

    pub async fn list_messages(
        &self,
        conversation_id: &str,
        limit: i64,
        skip: i64,
    ) -> Result<Vec<StoredMessage>, ClerkError> {
        self.store.list_messages(conversation_id, limit, skip).await
    }

    /// A user's conversations with last-message previews truncated for
    /// display.
    pub async fn list_conversations(
        &self,
        user_id: &str,
        limit: i64,
        skip: i64,
    ) -> Result<Vec<ConversationSummary>, ClerkError> {
        let mut summaries = self.store.list_conversations(user_id, limit, skip).await?;
        for summary in &mut summaries {
            if let Some(preview) = &mut summary.last_message {
                preview.content = truncate_preview(&preview.content);
            }
        }
        Ok(summaries)
    }

    pub async fn delete_conversation(&self, id: &str) -> Result<bool, ClerkError> {
        self.store.delete_conversation(id).await
    }

    pub async fn statistics(&self, user_id: &str) -> Result<ConversationStats, ClerkError> {
        self.store.statistics(user_id).await
    }
}

/// Truncate a preview to 100 characters, appending an ellipsis when cut.
fn truncate_preview(content: &str) -> String {
    if content.chars().count() <= PREVIEW_MAX_CHARS {
        return content.to_string();
    }
    let mut out: String = content.chars().take(PREVIEW_MAX_CHARS).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopclerk_storage::SqliteStore;
    use tempfile::tempdir;

    async fn manager() -> (ConversationManager, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let store = SqliteStore::open(db_path.to_str().unwrap(), true)
            .await
            .unwrap();
        (ConversationManager::new(Arc::new(store)), dir)
    }

    #[test]
    fn short_previews_pass_through_unchanged() {
        assert_eq!(truncate_preview("hello"), "hello");
        let exactly_100 = "x".repeat(100);
        assert_eq!(truncate_preview(&exactly_100), exactly_100);
    }

    #[test]
    fn long_previews_are_cut_with_ellipsis() {
        let long = "y".repeat(140);
        let preview = truncate_preview(&long);
        assert_eq!(preview.chars().count(), 103);
        assert!(preview.ends_with("..."));
    }

    #[tokio::test]
    async fn create_assigns_id_and_default_title() {
        let (manager, _dir) = manager().await;
        let conversation = manager.create_conversation("u-1", None).await.unwrap();
        assert!(!conversation.id.is_empty());
        assert!(conversation.title.starts_with("Conversation "));
        assert_eq!(conversation.status, "active");
        assert_eq!(conversation.message_count, 0);

        let fetched = manager
            .get_conversation(&conversation.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.id, conversation.id);
    }

    #[tokio::test]
    async fn create_honors_explicit_title() {
        let (manager, _dir) = manager().await;
        let conversation = manager
            .create_conversation("u-1", Some("Returns question".to_string()))
            .await
            .unwrap();
        assert_eq!(conversation.title, "Returns question");
    }

    #[tokio::test]
    async fn listing_truncates_long_last_messages() {
        let (manager, _dir) = manager().await;
        let conversation = manager.create_conversation("u-1", None).await.unwrap();
        let long_content = "z".repeat(150);
        manager
            .add_message(&conversation.id, Role::User, &long_content, None)
            .await
            .unwrap();

        let summaries = manager.list_conversations("u-1", 20, 0).await.unwrap();
        let preview = summaries[0].last_message.as_ref().unwrap();
        assert_eq!(preview.content.chars().count(), 103);
        assert!(preview.content.ends_with("..."));
    }
}
