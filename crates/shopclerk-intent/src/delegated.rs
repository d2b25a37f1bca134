// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delegated intent resolution via the external classification function.
//!
//! The classifier's output is untrusted text: it must parse as JSON, carry a
//! `query_type` inside the known enumeration, and only then are its fields
//! used. Any validation failure degrades to an `unclear` intent with a
//! canned clarification, exactly like a transport-level failure of the call
//! itself. Resolution never returns an error.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use shopclerk_core::{
    ChatProvider, Classification, IntentKind, QueryIntent, ResolvedIntent, StoredMessage,
};

use crate::IntentResolver;
use crate::context::render_context;
use crate::rules;

/// Clarification used when the classifier answered but the payload failed
/// validation.
const CLARIFY_INVALID_PAYLOAD: &str =
    "Could you please clarify what specific information you're looking for?";

/// Clarification used when the classification call itself failed.
const CLARIFY_CALL_FAILED: &str =
    "I'm having trouble understanding your request. Could you please rephrase?";

/// Wire shape of the classifier's JSON answer, before validation.
#[derive(Debug, Deserialize)]
struct RawClassification {
    query_type: String,
    #[serde(default)]
    search_terms: Vec<String>,
    #[serde(default)]
    clarifying_questions: Vec<String>,
}

/// The delegated intent resolution strategy.
pub struct LlmResolver {
    provider: Arc<dyn ChatProvider>,
}

impl LlmResolver {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl IntentResolver for LlmResolver {
    async fn resolve(&self, query: &str, context_window: &[StoredMessage]) -> QueryIntent {
        let context = render_context(context_window);

        let raw = match self.provider.classify(query, &context).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "classification call failed");
                return QueryIntent::new(
                    ResolvedIntent::Unclear {
                        clarification: Some(CLARIFY_CALL_FAILED.to_string()),
                    },
                    query,
                );
            }
        };

        let intent = match parse_classification(&raw) {
            Some(classification) => classification_to_intent(classification, query),
            None => {
                tracing::warn!("classification payload failed validation");
                ResolvedIntent::Unclear {
                    clarification: Some(CLARIFY_INVALID_PAYLOAD.to_string()),
                }
            }
        };
        QueryIntent::new(intent, query)
    }
}

/// Validate a raw classifier answer. Returns `None` unless the payload is
/// well-formed JSON of the expected shape with a known `query_type`.
pub fn parse_classification(raw: &str) -> Option<Classification> {
    let parsed: RawClassification = serde_json::from_str(raw).ok()?;
    let query_type = IntentKind::from_str(&parsed.query_type).ok()?;
    Some(Classification {
        query_type,
        search_terms: parsed.search_terms,
        clarifying_questions: parsed.clarifying_questions,
    })
}

/// Map a validated classification onto the intent contract.
///
/// The classifier's `search_terms` take priority as parameters; when it
/// supplies none, the deterministic extractors recover them from the raw
/// query so both strategies stay behaviorally aligned.
fn classification_to_intent(classification: Classification, query: &str) -> ResolvedIntent {
    let joined_terms = classification.search_terms.join(" ");
    match classification.query_type {
        IntentKind::StockCheck => ResolvedIntent::StockCheck {
            product: if joined_terms.is_empty() {
                rules::extract_stock_product(query)
            } else {
                joined_terms
            },
        },
        // The order id always comes from the query itself; models routinely
        // paraphrase numbers.
        IntentKind::OrderStatus => ResolvedIntent::OrderStatus {
            order_id: rules::extract_order_id(query),
        },
        IntentKind::TopProducts => ResolvedIntent::TopProducts,
        IntentKind::ProductSearch => ResolvedIntent::ProductSearch {
            term: if joined_terms.is_empty() {
                query.to_string()
            } else {
                joined_terms
            },
        },
        IntentKind::CategoryBrowse => ResolvedIntent::CategoryBrowse {
            category: if joined_terms.is_empty() {
                rules::extract_category(query)
            } else {
                joined_terms
            },
        },
        IntentKind::Unclear => ResolvedIntent::Unclear {
            clarification: classification.clarifying_questions.into_iter().next(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopclerk_test_utils::MockChatProvider;

    fn resolver_with(provider: MockChatProvider) -> LlmResolver {
        LlmResolver::new(Arc::new(provider))
    }

    #[test]
    fn parse_rejects_unknown_kind_and_bad_json() {
        assert!(parse_classification("not json at all").is_none());
        assert!(parse_classification(r#"{"query_type": "refund_request"}"#).is_none());
        assert!(parse_classification(r#"{"search_terms": ["x"]}"#).is_none());
    }

    #[test]
    fn parse_accepts_minimal_payload() {
        let c = parse_classification(r#"{"query_type": "top_products"}"#).unwrap();
        assert_eq!(c.query_type, IntentKind::TopProducts);
        assert!(c.search_terms.is_empty());
    }

    #[tokio::test]
    async fn stock_check_uses_search_terms_as_product() {
        let provider = MockChatProvider::new();
        provider.push_classification(
            r#"{"query_type": "stock_check", "search_terms": ["Classic", "T-Shirt"]}"#,
        );
        let intent = resolver_with(provider)
            .resolve("How much stock is left for Classic T-Shirt", &[])
            .await;
        assert_eq!(
            intent.intent,
            ResolvedIntent::StockCheck {
                product: "Classic T-Shirt".to_string()
            }
        );
    }

    #[tokio::test]
    async fn order_status_re_extracts_digit_run_from_query() {
        let provider = MockChatProvider::new();
        provider.push_classification(
            r#"{"query_type": "order_status", "search_terms": ["my order"]}"#,
        );
        let intent = resolver_with(provider)
            .resolve("order status 12345", &[])
            .await;
        assert_eq!(
            intent.intent,
            ResolvedIntent::OrderStatus {
                order_id: "12345".to_string()
            }
        );
    }

    #[tokio::test]
    async fn empty_search_terms_fall_back_to_rule_extractors() {
        let provider = MockChatProvider::new();
        provider.push_classification(r#"{"query_type": "category_browse", "search_terms": []}"#);
        let intent = resolver_with(provider)
            .resolve("show me the Outerwear category", &[])
            .await;
        assert_eq!(
            intent.intent,
            ResolvedIntent::CategoryBrowse {
                category: "Outerwear".to_string()
            }
        );
    }

    #[tokio::test]
    async fn unparseable_payload_degrades_to_unclear_with_question() {
        let provider = MockChatProvider::new();
        provider.push_classification("I think the user wants shirts");
        let intent = resolver_with(provider).resolve("any shirts?", &[]).await;
        match intent.intent {
            ResolvedIntent::Unclear { clarification } => {
                assert_eq!(clarification.as_deref(), Some(CLARIFY_INVALID_PAYLOAD));
            }
            other => panic!("expected unclear, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_degrades_to_unclear_with_rephrase() {
        let provider = MockChatProvider::new();
        provider.push_classification_failure("connection refused");
        let intent = resolver_with(provider).resolve("any shirts?", &[]).await;
        match intent.intent {
            ResolvedIntent::Unclear { clarification } => {
                assert_eq!(clarification.as_deref(), Some(CLARIFY_CALL_FAILED));
            }
            other => panic!("expected unclear, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unclear_classification_forwards_first_question() {
        let provider = MockChatProvider::new();
        provider.push_classification(
            r#"{"query_type": "unclear", "clarifying_questions": ["Which product?", "Which size?"]}"#,
        );
        let intent = resolver_with(provider).resolve("hmm", &[]).await;
        assert_eq!(
            intent.intent,
            ResolvedIntent::Unclear {
                clarification: Some("Which product?".to_string())
            }
        );
    }
}
