// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data orchestration: map a resolved intent to grounding data.
//!
//! `fetch` is a pure function of the intent plus store content. Intents with
//! an empty required parameter short-circuit without touching the store; the
//! composer turns the empty echo into a "please specify" reply.

use std::sync::Arc;

use shopclerk_core::{CatalogStore, ClerkError, DataResult, QueryIntent, ResolvedIntent};

/// Result-set limits, matching the upstream aggregation pipelines.
const TOP_PRODUCTS_LIMIT: i64 = 5;
const PRODUCT_SEARCH_LIMIT: i64 = 5;
const CATEGORY_LIMIT: i64 = 10;

/// Retrieves grounding data for resolved intents.
pub struct DataOrchestrator {
    catalog: Arc<dyn CatalogStore>,
}

impl DataOrchestrator {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    /// Fetch the grounding data for one intent. Only store failures
    /// propagate; empty results are ordinary `DataResult`s.
    pub async fn fetch(&self, intent: &QueryIntent) -> Result<DataResult, ClerkError> {
        match &intent.intent {
            ResolvedIntent::StockCheck { product } => {
                let product = product.trim();
                if product.is_empty() {
                    return Ok(DataResult::Stock {
                        rows: Vec::new(),
                        search_term: String::new(),
                    });
                }
                let rows = self.catalog.stock_for_product(product).await?;
                Ok(DataResult::Stock {
                    rows,
                    search_term: product.to_string(),
                })
            }
            ResolvedIntent::OrderStatus { order_id } => {
                let order_id = order_id.trim();
                if order_id.is_empty() {
                    return Ok(DataResult::Order {
                        order: None,
                        order_id: String::new(),
                    });
                }
                let order = self.catalog.order_by_id(order_id).await?;
                Ok(DataResult::Order {
                    order,
                    order_id: order_id.to_string(),
                })
            }
            ResolvedIntent::TopProducts => {
                let rows = self.catalog.top_sold_products(TOP_PRODUCTS_LIMIT).await?;
                Ok(DataResult::TopProducts { rows })
            }
            ResolvedIntent::ProductSearch { term } => {
                let rows = self
                    .catalog
                    .search_products(term, PRODUCT_SEARCH_LIMIT)
                    .await?;
                Ok(DataResult::Products {
                    rows,
                    search_term: term.clone(),
                })
            }
            ResolvedIntent::CategoryBrowse { category } => {
                let category = category.trim();
                if category.is_empty() {
                    return Ok(DataResult::Category {
                        rows: Vec::new(),
                        category: String::new(),
                    });
                }
                let rows = self
                    .catalog
                    .products_in_category(category, CATEGORY_LIMIT)
                    .await?;
                Ok(DataResult::Category {
                    rows,
                    category: category.to_string(),
                })
            }
            ResolvedIntent::Unclear { clarification } => Ok(DataResult::NoData {
                clarification: clarification.clone(),
            }),
        }
    }

    /// Connectivity check, forwarded to the catalog store.
    pub async fn ping(&self) -> Result<(), ClerkError> {
        self.catalog.ping().await
    }

    /// Distinct products across the catalog (browse endpoint).
    pub async fn list_products(
        &self,
        limit: i64,
    ) -> Result<Vec<shopclerk_core::types::ProductRow>, ClerkError> {
        self.catalog.list_products(limit).await
    }

    /// Most recent orders (browse endpoint).
    pub async fn list_orders(
        &self,
        limit: i64,
    ) -> Result<Vec<shopclerk_core::OrderRecord>, ClerkError> {
        self.catalog.list_orders(limit).await
    }
}
