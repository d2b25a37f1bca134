// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic rule-based intent resolution.
//!
//! Ordered keyword checks on the lower-cased query, first match wins. The
//! rule order is a deliberate tie-break: stock and order-status rules run
//! before the generic product rule because their trigger words are more
//! specific signals. Each parameter extractor is a named function so its
//! regex can be tested in isolation.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use shopclerk_core::{QueryIntent, ResolvedIntent, StoredMessage};

use crate::IntentResolver;

static DIGIT_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid digit-run regex"));

static CATEGORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:in|for|show)\s+(?:me\s+)?(?:the\s+)?(\w+(?:\s+\w+)*?)\s+(?:category|department|products)",
    )
    .expect("valid category regex")
});

/// Words that end the product-name span in a stock question.
const STOCK_TRIGGERS: &[&str] = &["stock", "left", "quantity"];

/// The deterministic intent resolution strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleResolver;

impl RuleResolver {
    pub fn new() -> Self {
        Self
    }

    /// Apply the ordered rules to one query.
    pub fn classify(query: &str) -> ResolvedIntent {
        let lower = query.to_lowercase();

        if lower.contains("stock") || lower.contains("left") {
            ResolvedIntent::StockCheck {
                product: extract_stock_product(query),
            }
        } else if lower.contains("order") && lower.contains("status") {
            ResolvedIntent::OrderStatus {
                order_id: extract_order_id(query),
            }
        } else if lower.contains("top") && (lower.contains("product") || lower.contains("sold")) {
            ResolvedIntent::TopProducts
        } else if lower.contains("product") {
            ResolvedIntent::ProductSearch {
                term: query.to_string(),
            }
        } else if lower.contains("category") || lower.contains("department") {
            ResolvedIntent::CategoryBrowse {
                category: extract_category(query),
            }
        } else {
            ResolvedIntent::Unclear {
                clarification: None,
            }
        }
    }
}

#[async_trait]
impl IntentResolver for RuleResolver {
    async fn resolve(&self, query: &str, _context_window: &[StoredMessage]) -> QueryIntent {
        let intent = Self::classify(query);
        tracing::debug!(kind = %QueryIntent::new(intent.clone(), query).kind(), "rules resolved intent");
        QueryIntent::new(intent, query)
    }
}

/// Product-name span of a stock question: every token before the first
/// trigger word ("stock", "left", "quantity"), provided that trigger is not
/// the first token. No mid-string trigger means the user never named a
/// product, so the parameter stays empty and the caller asks for
/// clarification.
pub fn extract_stock_product(query: &str) -> String {
    let words: Vec<&str> = query.split_whitespace().collect();
    for (i, word) in words.iter().enumerate() {
        if i > 0 && STOCK_TRIGGERS.contains(&word.to_lowercase().as_str()) {
            return words[..i].join(" ");
        }
    }
    String::new()
}

/// Order id of an order-status question: the first run of digits anywhere in
/// the query. Users write "order 12345", "order id 12345", and
/// "order status 12345" interchangeably, so the digit run itself is the only
/// reliable anchor.
pub fn extract_order_id(query: &str) -> String {
    DIGIT_RUN_RE
        .find(query)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Category phrase of a browse question: the words between a leading trigger
/// ("in"/"for"/"show", optionally followed by "me" and/or "the") and a
/// trailing trigger ("category"/"department"/"products").
pub fn extract_category(query: &str) -> String {
    CATEGORY_RE
        .captures(query)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
