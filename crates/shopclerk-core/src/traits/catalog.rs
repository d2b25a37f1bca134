// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog store trait: aggregation queries over inventory units and orders.

use async_trait::async_trait;

use crate::error::ClerkError;
use crate::types::{CategoryRow, OrderRecord, ProductRow, SoldRow, StockRow};

/// Read-side access to the catalog and order store.
///
/// Every string match is an unanchored, case-insensitive substring match.
/// That is deliberate: users type partial product names ("shirt" must find
/// "Classic T-Shirt"), at the cost of occasional false positives. All
/// grouped results carry an explicit deterministic order so limits truncate
/// reproducibly.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Available stock (units never sold) for products whose name contains
    /// `name_fragment`. At most one group is returned.
    async fn stock_for_product(&self, name_fragment: &str) -> Result<Vec<StockRow>, ClerkError>;

    /// Exact point lookup of an order by its upstream `order_id`.
    async fn order_by_id(&self, order_id: &str) -> Result<Option<OrderRecord>, ClerkError>;

    /// Best-selling products (sold units only), ordered by sold count
    /// descending with name/brand as tie-break.
    async fn top_sold_products(&self, limit: i64) -> Result<Vec<SoldRow>, ClerkError>;

    /// Products whose name contains `term`, with total and available counts.
    async fn search_products(&self, term: &str, limit: i64) -> Result<Vec<ProductRow>, ClerkError>;

    /// Products whose category contains `category`, with available counts.
    async fn products_in_category(
        &self,
        category: &str,
        limit: i64,
    ) -> Result<Vec<CategoryRow>, ClerkError>;

    /// Distinct products across the whole catalog (browse endpoint).
    async fn list_products(&self, limit: i64) -> Result<Vec<ProductRow>, ClerkError>;

    /// Most recent orders (browse endpoint).
    async fn list_orders(&self, limit: i64) -> Result<Vec<OrderRecord>, ClerkError>;

    /// Cheap connectivity check for health reporting.
    async fn ping(&self) -> Result<(), ClerkError>;
}
