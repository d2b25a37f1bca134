// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response composition: deterministic templates plus an optional delegated
//! generation stage.
//!
//! Every reply starts from a fixed per-kind template over the grounding
//! rows. With generation enabled, that deterministic text becomes the data
//! summary handed to the provider; any generation failure falls back to a
//! canned apology, never an error. The user always receives a response.

use std::sync::Arc;

use shopclerk_core::{ChatProvider, DataResult, Reply};

/// System instruction for the delegated generation stage.
const GENERATE_SYSTEM_PROMPT: &str = "You are a helpful e-commerce customer support chatbot. Use the provided data to answer the user's question accurately and helpfully.

Guidelines:
- Be friendly and professional
- Use the data provided to give specific, accurate answers
- If data is not available, politely explain what you couldn't find
- Suggest alternatives when possible
- Keep responses concise but informative
- Include relevant details like prices, stock levels, etc.

Format responses clearly with bullet points or numbered lists when showing multiple items.";

/// Returned when the generation stage fails; the deterministic path never
/// needs it.
const APOLOGY_FALLBACK: &str = "I apologize, but I'm having trouble processing your request right now. Please try again or contact support if the problem persists.";

const GENERAL_HELP: &str = "I can help you with product information, order status, stock queries, and category searches. Please ask me about products, orders, stock levels, or categories.";

/// Composes the final reply from grounding data.
pub struct ResponseComposer {
    provider: Option<Arc<dyn ChatProvider>>,
}

impl ResponseComposer {
    /// A composer that returns the deterministic formatting directly.
    pub fn deterministic() -> Self {
        Self { provider: None }
    }

    /// A composer that reworks the deterministic formatting through the
    /// generation function.
    pub fn with_generation(provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Render a reply for the given data.
    ///
    /// `context_summary` is the rendered conversation window; it is only
    /// consulted by the generation stage.
    pub async fn render(
        &self,
        data: &DataResult,
        raw_query: &str,
        context_summary: &str,
    ) -> Reply {
        let deterministic = format_data(data);

        let Some(provider) = &self.provider else {
            return deterministic;
        };

        let user_message = build_generation_request(raw_query, &deterministic.text, context_summary);
        match provider.generate(GENERATE_SYSTEM_PROMPT, &user_message).await {
            Ok(text) if !text.trim().is_empty() => Reply {
                text,
                kind: deterministic.kind,
                payload: deterministic.payload,
            },
            Ok(_) => {
                tracing::warn!("generation returned empty output, using apology fallback");
                apology_reply()
            }
            Err(e) => {
                tracing::warn!(error = %e, "generation failed, using apology fallback");
                apology_reply()
            }
        }
    }
}

fn apology_reply() -> Reply {
    Reply {
        text: APOLOGY_FALLBACK.to_string(),
        kind: "error".to_string(),
        payload: None,
    }
}

fn build_generation_request(raw_query: &str, data_summary: &str, context_summary: &str) -> String {
    let mut out = format!("User Query: {raw_query}\n\nAvailable Data: {data_summary}\n");
    if !context_summary.is_empty() {
        out.push_str(&format!("\nConversation Context: {context_summary}\n"));
    }
    out.push_str("\nPlease provide a helpful response based on the available data.");
    out
}

/// Deterministic per-kind formatting of grounding data.
///
/// Not-found sentences echo the user's own search term or id verbatim so a
/// typo can be corrected.
pub fn format_data(data: &DataResult) -> Reply {
    let kind = data.kind_tag().to_string();
    match data {
        DataResult::Stock { rows, search_term } => {
            if search_term.is_empty() {
                return Reply {
                    text: "Please specify which product you'd like to check stock for."
                        .to_string(),
                    kind,
                    payload: None,
                };
            }
            match rows.first() {
                Some(row) => Reply {
                    text: format!(
                        "{} ({}) has {} units left in stock at ${:.2} each.",
                        row.product_name, row.product_brand, row.stock_count,
                        row.product_retail_price
                    ),
                    kind,
                    payload: serde_json::to_value(rows).ok(),
                },
                None => Reply {
                    text: format!(
                        "I couldn't find any stock for products matching '{search_term}'. \
                         Please check the product name and try again."
                    ),
                    kind,
                    payload: None,
                },
            }
        }
        DataResult::Order { order, order_id } => {
            if order_id.is_empty() {
                return Reply {
                    text: "Please provide an order ID to check the status.".to_string(),
                    kind,
                    payload: None,
                };
            }
            match order {
                Some(order) => Reply {
                    text: format!(
                        "Order {} status: {}. Items: {}, Created: {}",
                        order.order_id, order.status, order.num_of_item, order.created_at
                    ),
                    kind,
                    payload: serde_json::to_value(order).ok(),
                },
                None => Reply {
                    text: format!(
                        "Order {order_id} not found. Please check the order ID and try again."
                    ),
                    kind,
                    payload: None,
                },
            }
        }
        DataResult::TopProducts { rows } => {
            if rows.is_empty() {
                return Reply {
                    text: "No sales data found in the database.".to_string(),
                    kind,
                    payload: None,
                };
            }
            let mut text = String::from("Top 5 most sold products:\n");
            for (i, row) in rows.iter().enumerate() {
                text.push_str(&format!(
                    "{}. {} ({}) - ${:.2} (Sold: {})\n",
                    i + 1,
                    row.product_name,
                    row.product_brand,
                    row.product_retail_price,
                    row.sold_count
                ));
            }
            Reply {
                text,
                kind,
                payload: serde_json::to_value(rows).ok(),
            }
        }
        DataResult::Products { rows, search_term } => {
            if rows.is_empty() {
                return Reply {
                    text: format!("No products found matching '{search_term}'."),
                    kind,
                    payload: None,
                };
            }
            let mut text = format!("Found {} product(s):\n", rows.len());
            for row in rows {
                text.push_str(&format!(
                    "- {} ({}): ${:.2} (Available: {})\n",
                    row.product_name, row.product_brand, row.product_retail_price,
                    row.available_stock
                ));
            }
            Reply {
                text,
                kind,
                payload: serde_json::to_value(rows).ok(),
            }
        }
        DataResult::Category { rows, category } => {
            if category.is_empty() {
                return Reply {
                    text: "Please specify which category you'd like to browse.".to_string(),
                    kind,
                    payload: None,
                };
            }
            if rows.is_empty() {
                return Reply {
                    text: format!("No products found in the {category} category."),
                    kind,
                    payload: None,
                };
            }
            let mut text = format!("Products in {category} category:\n");
            for row in rows {
                text.push_str(&format!(
                    "- {} ({}): ${:.2} (Available: {})\n",
                    row.product_name, row.product_brand, row.product_retail_price,
                    row.available_stock
                ));
            }
            Reply {
                text,
                kind,
                payload: serde_json::to_value(rows).ok(),
            }
        }
        DataResult::NoData { clarification } => Reply {
            text: clarification
                .clone()
                .unwrap_or_else(|| GENERAL_HELP.to_string()),
            kind,
            payload: None,
        },
    }
}
