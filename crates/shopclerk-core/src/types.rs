// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Shopclerk pipeline.
//!
//! The central values are [`QueryIntent`] (what the user asked for, produced
//! by an intent resolver) and [`DataResult`] (the grounding data retrieved
//! for that intent, produced by the data orchestrator). Both are transient
//! per-request values; the persistent entities are [`Conversation`] and
//! [`StoredMessage`].

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// --- Conversation entities ---

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A multi-turn support conversation.
///
/// `message_count` always equals the number of messages whose
/// `conversation_id` points here; the storage layer increments it in the
/// same transaction that inserts a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub status: String,
    pub created_at: String,
    pub last_activity: String,
    pub message_count: i64,
}

/// A single persisted message within a conversation.
///
/// `seq` is a 1-based per-conversation sequence number assigned at insert
/// time. Ordering within a conversation always sorts by `seq`, never by
/// timestamp, so ordering survives clocks with coarse resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: String,
    pub conversation_id: String,
    pub seq: i64,
    pub role: String,
    pub content: String,
    pub metadata: Option<String>,
    pub created_at: String,
}

/// A conversation plus a preview of its most recent message, as returned by
/// conversation listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub last_message: Option<MessagePreview>,
}

/// Preview of the last message in a conversation listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePreview {
    pub role: String,
    pub content: String,
    pub created_at: String,
}

/// Aggregated per-user conversation statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationStats {
    pub total_conversations: i64,
    pub total_messages: i64,
    pub avg_messages_per_conversation: f64,
    pub first_conversation_at: Option<String>,
    pub last_conversation_at: Option<String>,
}

// --- Catalog entities ---

/// One physical unit of a product in the inventory fact table.
///
/// `sold_at == None` means the unit is available stock; stock and sold
/// counts are always derived aggregates over these rows, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryUnit {
    pub product_name: String,
    pub product_brand: String,
    pub product_category: String,
    pub product_retail_price: f64,
    pub sold_at: Option<String>,
}

/// A customer order as imported from the upstream order system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub user_id: String,
    pub status: String,
    pub num_of_item: i64,
    pub created_at: String,
    pub shipped_at: Option<String>,
    pub delivered_at: Option<String>,
}

// --- Aggregation result rows ---

/// Available-stock aggregate for one distinct product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRow {
    pub product_name: String,
    pub product_brand: String,
    pub product_retail_price: f64,
    pub stock_count: i64,
}

/// Sold-unit aggregate for one distinct product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoldRow {
    pub product_name: String,
    pub product_brand: String,
    pub product_retail_price: f64,
    pub sold_count: i64,
}

/// Full product aggregate: total units plus available stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    pub product_name: String,
    pub product_brand: String,
    pub product_category: String,
    pub product_retail_price: f64,
    pub total_items: i64,
    pub available_stock: i64,
}

/// Availability aggregate for one product within a category listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub product_name: String,
    pub product_brand: String,
    pub product_retail_price: f64,
    pub available_stock: i64,
}

// --- Intent resolution ---

/// The fixed set of query intents the service understands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    StockCheck,
    OrderStatus,
    TopProducts,
    ProductSearch,
    CategoryBrowse,
    Unclear,
}

/// A classified intent with its kind-specific parameters.
///
/// Parameters live inside the variant so a kind can never be paired with
/// another kind's parameters. Empty-string parameters mean "the user did not
/// say" and downstream code must ask for clarification instead of querying.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedIntent {
    StockCheck { product: String },
    OrderStatus { order_id: String },
    TopProducts,
    ProductSearch { term: String },
    CategoryBrowse { category: String },
    Unclear { clarification: Option<String> },
}

/// Output of intent resolution: the resolved intent plus the raw query it
/// was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryIntent {
    pub intent: ResolvedIntent,
    pub raw_query: String,
}

impl QueryIntent {
    pub fn new(intent: ResolvedIntent, raw_query: impl Into<String>) -> Self {
        Self {
            intent,
            raw_query: raw_query.into(),
        }
    }

    /// The kind tag for this intent.
    pub fn kind(&self) -> IntentKind {
        match self.intent {
            ResolvedIntent::StockCheck { .. } => IntentKind::StockCheck,
            ResolvedIntent::OrderStatus { .. } => IntentKind::OrderStatus,
            ResolvedIntent::TopProducts => IntentKind::TopProducts,
            ResolvedIntent::ProductSearch { .. } => IntentKind::ProductSearch,
            ResolvedIntent::CategoryBrowse { .. } => IntentKind::CategoryBrowse,
            ResolvedIntent::Unclear { .. } => IntentKind::Unclear,
        }
    }
}

/// Validated output of the external classification function.
///
/// Produced only after the raw provider payload has passed JSON-shape
/// validation; untrusted payloads never reach the pipeline in this form.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub query_type: IntentKind,
    pub search_terms: Vec<String>,
    pub clarifying_questions: Vec<String>,
}

// --- Orchestration output ---

/// Grounding data retrieved for one resolved intent.
///
/// Each variant echoes the parameter it was queried with so the composer can
/// repeat the user's own words back in not-found messages.
#[derive(Debug, Clone, PartialEq)]
pub enum DataResult {
    Stock {
        rows: Vec<StockRow>,
        search_term: String,
    },
    Order {
        order: Option<OrderRecord>,
        order_id: String,
    },
    TopProducts {
        rows: Vec<SoldRow>,
    },
    Products {
        rows: Vec<ProductRow>,
        search_term: String,
    },
    Category {
        rows: Vec<CategoryRow>,
        category: String,
    },
    NoData {
        clarification: Option<String>,
    },
}

impl DataResult {
    /// Response-kind tag used in message metadata and API responses.
    pub fn kind_tag(&self) -> &'static str {
        match self {
            DataResult::Stock { .. } => "stock_check",
            DataResult::Order { .. } => "order_status",
            DataResult::TopProducts { .. } => "top_products",
            DataResult::Products { .. } => "product_search",
            DataResult::Category { .. } => "category_browse",
            DataResult::NoData { .. } => "no_data",
        }
    }
}

/// The composed reply returned to the caller: final text, a kind tag, and an
/// optional structured echo of the grounding rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub kind: String,
    pub payload: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn intent_kind_round_trips_through_strings() {
        let kinds = [
            IntentKind::StockCheck,
            IntentKind::OrderStatus,
            IntentKind::TopProducts,
            IntentKind::ProductSearch,
            IntentKind::CategoryBrowse,
            IntentKind::Unclear,
        ];
        for kind in kinds {
            let s = kind.to_string();
            assert_eq!(IntentKind::from_str(&s).unwrap(), kind);
        }
        assert_eq!(IntentKind::StockCheck.to_string(), "stock_check");
    }

    #[test]
    fn intent_kind_rejects_unknown_strings() {
        assert!(IntentKind::from_str("refund_request").is_err());
        assert!(IntentKind::from_str("").is_err());
    }

    #[test]
    fn query_intent_kind_matches_variant() {
        let intent = QueryIntent::new(
            ResolvedIntent::OrderStatus {
                order_id: "12345".into(),
            },
            "order status 12345",
        );
        assert_eq!(intent.kind(), IntentKind::OrderStatus);
    }

    #[test]
    fn data_result_kind_tags() {
        let stock = DataResult::Stock {
            rows: vec![],
            search_term: "shirt".into(),
        };
        assert_eq!(stock.kind_tag(), "stock_check");
        let none = DataResult::NoData {
            clarification: None,
        };
        assert_eq!(none.kind_tag(), "no_data");
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }
}
