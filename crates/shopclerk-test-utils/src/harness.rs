// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end pipeline testing.
//!
//! `TestHarness` assembles a complete chat stack: temp SQLite store, mock
//! chat provider, the configured resolver strategy, and the chat service.
//! Seeding helpers populate the catalog without going through an import.

use std::sync::Arc;

use shopclerk_chat::{ChatService, DataOrchestrator, ResponseComposer};
use shopclerk_core::{CatalogStore, ClerkError, ConversationStore, InventoryUnit, OrderRecord};
use shopclerk_intent::{IntentResolver, LlmResolver, RuleResolver};
use shopclerk_storage::SqliteStore;

use crate::mock_provider::MockChatProvider;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    use_llm_resolver: bool,
    use_generation: bool,
    context_window_turns: i64,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            use_llm_resolver: false,
            use_generation: false,
            context_window_turns: 6,
        }
    }

    /// Use the delegated resolver backed by the mock provider.
    pub fn with_llm_resolver(mut self) -> Self {
        self.use_llm_resolver = true;
        self
    }

    /// Enable the generation stage backed by the mock provider.
    pub fn with_generation(mut self) -> Self {
        self.use_generation = true;
        self
    }

    /// Override the context window size.
    pub fn with_context_window(mut self, turns: i64) -> Self {
        self.context_window_turns = turns;
        self
    }

    /// Build the harness, creating the temp store and wiring the pipeline.
    pub async fn build(self) -> Result<TestHarness, ClerkError> {
        let temp_dir = tempfile::TempDir::new().map_err(|e| ClerkError::Storage {
            source: Box::new(e),
        })?;
        let db_path = temp_dir.path().join("test.db");
        let store = Arc::new(
            SqliteStore::open(db_path.to_str().unwrap_or("test.db"), true).await?,
        );

        let provider = Arc::new(MockChatProvider::new());

        let resolver: Arc<dyn IntentResolver> = if self.use_llm_resolver {
            Arc::new(LlmResolver::new(provider.clone()))
        } else {
            Arc::new(RuleResolver::new())
        };

        let composer = if self.use_generation {
            ResponseComposer::with_generation(provider.clone())
        } else {
            ResponseComposer::deterministic()
        };

        let orchestrator = DataOrchestrator::new(store.clone() as Arc<dyn CatalogStore>);
        let service = Arc::new(ChatService::new(
            resolver,
            orchestrator,
            composer,
            store.clone() as Arc<dyn ConversationStore>,
            self.context_window_turns,
        ));

        Ok(TestHarness {
            provider,
            store,
            service,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with a temp store and mock provider.
pub struct TestHarness {
    /// The mock chat provider; queue answers here before driving the service.
    pub provider: Arc<MockChatProvider>,
    /// The SQLite store (temp DB, removed on drop).
    pub store: Arc<SqliteStore>,
    /// The assembled chat service, shared so callers can hand it to a router.
    pub service: Arc<ChatService>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Seed `count` inventory units of one product.
    pub async fn seed_units(
        &self,
        name: &str,
        brand: &str,
        category: &str,
        price: f64,
        count: usize,
        sold: bool,
    ) -> Result<(), ClerkError> {
        let unit = InventoryUnit {
            product_name: name.to_string(),
            product_brand: brand.to_string(),
            product_category: category.to_string(),
            product_retail_price: price,
            sold_at: sold.then(|| "2026-01-15T12:00:00.000Z".to_string()),
        };
        for _ in 0..count {
            self.store.insert_inventory_unit(&unit).await?;
        }
        Ok(())
    }

    /// Seed one order.
    pub async fn seed_order(
        &self,
        order_id: &str,
        user_id: &str,
        status: &str,
        num_of_item: i64,
    ) -> Result<(), ClerkError> {
        self.store
            .insert_order(&OrderRecord {
                order_id: order_id.to_string(),
                user_id: user_id.to_string(),
                status: status.to_string(),
                num_of_item,
                created_at: "2026-01-10T08:00:00.000Z".to_string(),
                shipped_at: None,
                delivered_at: None,
            })
            .await
    }
}
