// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait adapter binding the core storage traits to the SQLite query layer.

use async_trait::async_trait;
use shopclerk_core::{
    CatalogStore, ClerkError, Conversation, ConversationStats, ConversationStore,
    ConversationSummary, InventoryUnit, OrderRecord, Role, StoredMessage,
    types::{CategoryRow, ProductRow, SoldRow, StockRow},
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed implementation of [`CatalogStore`] and [`ConversationStore`].
///
/// Cloning shares the underlying single-writer connection.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open (or create) the store at `path` and run migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, ClerkError> {
        let db = Database::open_with_options(path, wal_mode).await?;
        Ok(Self { db })
    }

    /// Wrap an already-open database handle.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Seed one inventory unit (import path, not part of the store traits).
    pub async fn insert_inventory_unit(&self, unit: &InventoryUnit) -> Result<(), ClerkError> {
        queries::catalog::insert_inventory_unit(&self.db, unit).await
    }

    /// Seed one order record (import path, not part of the store traits).
    pub async fn insert_order(&self, order: &OrderRecord) -> Result<(), ClerkError> {
        queries::catalog::insert_order(&self.db, order).await
    }
}

#[async_trait]
impl CatalogStore for SqliteStore {
    async fn stock_for_product(&self, name_fragment: &str) -> Result<Vec<StockRow>, ClerkError> {
        queries::catalog::stock_for_product(&self.db, name_fragment).await
    }

    async fn order_by_id(&self, order_id: &str) -> Result<Option<OrderRecord>, ClerkError> {
        queries::catalog::order_by_id(&self.db, order_id).await
    }

    async fn top_sold_products(&self, limit: i64) -> Result<Vec<SoldRow>, ClerkError> {
        queries::catalog::top_sold_products(&self.db, limit).await
    }

    async fn search_products(&self, term: &str, limit: i64) -> Result<Vec<ProductRow>, ClerkError> {
        queries::catalog::search_products(&self.db, term, limit).await
    }

    async fn products_in_category(
        &self,
        category: &str,
        limit: i64,
    ) -> Result<Vec<CategoryRow>, ClerkError> {
        queries::catalog::products_in_category(&self.db, category, limit).await
    }

    async fn list_products(&self, limit: i64) -> Result<Vec<ProductRow>, ClerkError> {
        queries::catalog::list_products(&self.db, limit).await
    }

    async fn list_orders(&self, limit: i64) -> Result<Vec<OrderRecord>, ClerkError> {
        queries::catalog::list_orders(&self.db, limit).await
    }

    async fn ping(&self) -> Result<(), ClerkError> {
        queries::catalog::ping(&self.db).await
    }
}

#[async_trait]
impl ConversationStore for SqliteStore {
    async fn create_conversation(&self, conversation: &Conversation) -> Result<(), ClerkError> {
        queries::conversations::create_conversation(&self.db, conversation).await
    }

    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, ClerkError> {
        queries::conversations::get_conversation(&self.db, id).await
    }

    async fn append_message(
        &self,
        conversation_id: &str,
        role: Role,
        content: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<StoredMessage, ClerkError> {
        queries::messages::append_message(&self.db, conversation_id, role, content, metadata).await
    }

    async fn recent_messages(
        &self,
        conversation_id: &str,
        max: i64,
    ) -> Result<Vec<StoredMessage>, ClerkError> {
        queries::messages::recent_messages(&self.db, conversation_id, max).await
    }

    async fn list_messages(
        &self,
        conversation_id: &str,
        limit: i64,
        skip: i64,
    ) -> Result<Vec<StoredMessage>, ClerkError> {
        queries::messages::list_messages(&self.db, conversation_id, limit, skip).await
    }

    async fn list_conversations(
        &self,
        user_id: &str,
        limit: i64,
        skip: i64,
    ) -> Result<Vec<ConversationSummary>, ClerkError> {
        queries::conversations::list_conversations(&self.db, user_id, limit, skip).await
    }

    async fn delete_conversation(&self, id: &str) -> Result<bool, ClerkError> {
        queries::conversations::delete_conversation(&self.db, id).await
    }

    async fn statistics(&self, user_id: &str) -> Result<ConversationStats, ClerkError> {
        queries::conversations::statistics(&self.db, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn store_exposes_both_trait_surfaces() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let store = SqliteStore::open(db_path.to_str().unwrap(), true)
            .await
            .unwrap();

        // CatalogStore surface.
        let catalog: &dyn CatalogStore = &store;
        catalog.ping().await.unwrap();
        assert!(catalog.top_sold_products(5).await.unwrap().is_empty());

        // ConversationStore surface.
        let conversations: &dyn ConversationStore = &store;
        let conversation = Conversation {
            id: "c-1".to_string(),
            user_id: "u-1".to_string(),
            title: "Conversation 2026-01-01 00:00".to_string(),
            status: "active".to_string(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            last_activity: "2026-01-01T00:00:00.000Z".to_string(),
            message_count: 0,
        };
        conversations
            .create_conversation(&conversation)
            .await
            .unwrap();
        let msg = conversations
            .append_message("c-1", Role::User, "hello", None)
            .await
            .unwrap();
        assert_eq!(msg.seq, 1);
    }
}
