// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end pipeline tests driving the chat service through both resolver
//! strategies against a temp database.

use shopclerk_core::ClerkError;
use shopclerk_test_utils::TestHarness;

#[tokio::test]
async fn order_status_parity_across_both_strategies() {
    // Neither store holds order 12345; both strategies must classify the
    // query identically and echo the id in the not-found reply.
    let rules = TestHarness::builder().build().await.unwrap();
    let outcome = rules
        .service
        .chat("u-1", None, "order status 12345")
        .await
        .unwrap();
    assert_eq!(outcome.kind, "order_status");
    assert_eq!(
        outcome.response_text,
        "Order 12345 not found. Please check the order ID and try again."
    );

    let llm = TestHarness::builder().with_llm_resolver().build().await.unwrap();
    llm.provider
        .push_classification(r#"{"query_type": "order_status", "search_terms": []}"#);
    let outcome = llm
        .service
        .chat("u-1", None, "order status 12345")
        .await
        .unwrap();
    assert_eq!(outcome.kind, "order_status");
    assert!(outcome.response_text.contains("12345"));
    assert!(outcome.response_text.contains("not found"));
}

#[tokio::test]
async fn order_status_renders_order_fields_when_present() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.seed_order("12345", "u-1", "Shipped", 2).await.unwrap();

    let outcome = harness
        .service
        .chat("u-1", None, "what is my order status for order 12345")
        .await
        .unwrap();
    assert!(outcome.response_text.starts_with("Order 12345 status: Shipped."));
    assert!(outcome.response_text.contains("Items: 2"));
    assert!(outcome.payload.is_some());
}

#[tokio::test]
async fn stock_check_counts_only_available_units() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness
        .seed_units("Classic T-Shirt", "Acme", "Tops", 19.99, 2, false)
        .await
        .unwrap();
    harness
        .seed_units("Classic T-Shirt", "Acme", "Tops", 19.99, 3, true)
        .await
        .unwrap();

    let outcome = harness
        .service
        .chat("u-1", None, "Classic T-Shirt stock")
        .await
        .unwrap();
    assert_eq!(outcome.kind, "stock_check");
    assert_eq!(
        outcome.response_text,
        "Classic T-Shirt (Acme) has 2 units left in stock at $19.99 each."
    );
}

#[tokio::test]
async fn delegated_stock_check_finds_single_unit_with_price() {
    // "How much stock is left for Classic T-Shirt" defeats the token-scan
    // extractor (the trigger word comes before the product name), so this
    // phrasing only works through the delegated strategy.
    let harness = TestHarness::builder().with_llm_resolver().build().await.unwrap();
    harness
        .seed_units("Classic T-Shirt", "Acme", "Tops", 19.99, 1, false)
        .await
        .unwrap();
    harness.provider.push_classification(
        r#"{"query_type": "stock_check", "search_terms": ["Classic T-Shirt"]}"#,
    );

    let outcome = harness
        .service
        .chat("u-1", None, "How much stock is left for Classic T-Shirt")
        .await
        .unwrap();
    assert_eq!(outcome.kind, "stock_check");
    assert!(outcome.response_text.contains("1 units left"));
    assert!(outcome.response_text.contains("$19.99"));
}

#[tokio::test]
async fn top_products_truncates_ties_deterministically() {
    let harness = TestHarness::builder().build().await.unwrap();
    // Seven sold products with counts [10, 10, 8, 5, 3, 1, 1].
    let products = [
        ("Aardvark Socks", 10),
        ("Zebra Scarf", 10),
        ("Heron Hat", 8),
        ("Mole Mittens", 5),
        ("Newt Beanie", 3),
        ("Otter Gloves", 1),
        ("Pike Poncho", 1),
    ];
    for (name, count) in products {
        harness
            .seed_units(name, "Brand", "Accessories", 9.99, count, true)
            .await
            .unwrap();
    }

    let outcome = harness
        .service
        .chat("u-1", None, "top 5 best sold products")
        .await
        .unwrap();
    assert_eq!(outcome.kind, "top_products");

    let lines: Vec<&str> = outcome
        .response_text
        .lines()
        .filter(|l| !l.is_empty())
        .collect();
    assert_eq!(lines[0], "Top 5 most sold products:");
    // Exactly 5 entries; the count-10 tie resolves by name ascending, and
    // the fifth entry outranks both excluded count-1 items.
    assert_eq!(lines.len(), 6);
    assert!(lines[1].starts_with("1. Aardvark Socks"));
    assert!(lines[2].starts_with("2. Zebra Scarf"));
    assert!(lines[5].starts_with("5. Newt Beanie"));
    assert!(!outcome.response_text.contains("Otter Gloves"));
    assert!(!outcome.response_text.contains("Pike Poncho"));
}

#[tokio::test]
async fn repeated_turns_keep_count_and_sequence_consistent() {
    let harness = TestHarness::builder().build().await.unwrap();

    let first = harness.service.chat("u-1", None, "hello").await.unwrap();
    let conversation_id = first.conversation_id.clone();
    for _ in 0..2 {
        harness
            .service
            .chat("u-1", Some(&conversation_id), "hello again")
            .await
            .unwrap();
    }

    // Three turns, each persisting a user and an assistant message.
    let (conversation, messages) = harness
        .service
        .get_messages(&conversation_id, 50, 0)
        .await
        .unwrap();
    assert_eq!(conversation.message_count, 6);
    assert_eq!(messages.len(), 6);
    for (i, msg) in messages.iter().enumerate() {
        assert_eq!(msg.seq, i as i64 + 1);
    }
}

#[tokio::test]
async fn delete_conversation_removes_history_and_reports_twice() {
    let harness = TestHarness::builder().build().await.unwrap();
    let outcome = harness.service.chat("u-1", None, "hello").await.unwrap();
    let id = outcome.conversation_id;

    assert!(harness.service.delete_conversation(&id).await.unwrap());
    assert!(!harness.service.delete_conversation(&id).await.unwrap());

    // Listing messages for the deleted conversation is a not-found outcome.
    let err = harness.service.get_messages(&id, 50, 0).await.unwrap_err();
    assert!(matches!(err, ClerkError::NotFound { .. }));
}

#[tokio::test]
async fn unparseable_classification_degrades_to_clarification() {
    let harness = TestHarness::builder().with_llm_resolver().build().await.unwrap();
    harness
        .provider
        .push_classification("sure! the user probably wants shirts");

    let outcome = harness
        .service
        .chat("u-1", None, "umm about that thing")
        .await
        .unwrap();
    assert_eq!(outcome.kind, "no_data");
    assert_eq!(
        outcome.response_text,
        "Could you please clarify what specific information you're looking for?"
    );
}

#[tokio::test]
async fn classification_transport_failure_degrades_to_rephrase() {
    let harness = TestHarness::builder().with_llm_resolver().build().await.unwrap();
    harness.provider.push_classification_failure("connection reset");

    let outcome = harness
        .service
        .chat("u-1", None, "any shirts?")
        .await
        .unwrap();
    assert_eq!(outcome.kind, "no_data");
    assert!(!outcome.response_text.is_empty());
    assert!(outcome.response_text.contains("rephrase"));
}

#[tokio::test]
async fn generation_failure_still_returns_a_reply() {
    let harness = TestHarness::builder().with_generation().build().await.unwrap();
    harness
        .seed_units("Classic T-Shirt", "Acme", "Tops", 19.99, 1, false)
        .await
        .unwrap();
    harness.provider.push_generation_failure("timeout");

    let outcome = harness
        .service
        .chat("u-1", None, "Classic T-Shirt stock")
        .await
        .unwrap();
    assert_eq!(outcome.kind, "error");
    assert!(outcome.response_text.contains("I apologize"));
}

#[tokio::test]
async fn empty_message_is_rejected_before_the_pipeline() {
    let harness = TestHarness::builder().build().await.unwrap();
    let err = harness.service.chat("u-1", None, "   ").await.unwrap_err();
    assert!(matches!(err, ClerkError::InvalidInput(_)));
    // Nothing was persisted.
    assert!(harness.service.list_conversations("u-1", 20, 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn chat_against_unknown_conversation_is_not_found() {
    let harness = TestHarness::builder().build().await.unwrap();
    let err = harness
        .service
        .chat("u-1", Some("no-such-conversation"), "hello")
        .await
        .unwrap_err();
    assert!(matches!(err, ClerkError::NotFound { .. }));
}

#[tokio::test]
async fn category_browse_and_product_search_round_trip() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness
        .seed_units("Classic T-Shirt", "Acme", "Tops", 19.99, 2, false)
        .await
        .unwrap();
    harness
        .seed_units("Denim Jacket", "Bolt", "Outerwear", 59.99, 1, false)
        .await
        .unwrap();

    let outcome = harness
        .service
        .chat("u-1", None, "what is in the Tops category")
        .await
        .unwrap();
    assert_eq!(outcome.kind, "category_browse");
    assert!(outcome.response_text.starts_with("Products in Tops category:"));
    assert!(outcome.response_text.contains("Classic T-Shirt"));
    assert!(!outcome.response_text.contains("Denim Jacket"));

    // The deterministic strategy searches on the verbatim query, so the
    // no-match reply echoes it back.
    let outcome = harness
        .service
        .chat("u-1", None, "any velvet cape products")
        .await
        .unwrap();
    assert_eq!(outcome.kind, "product_search");
    assert_eq!(
        outcome.response_text,
        "No products found matching 'any velvet cape products'."
    );

    // A match needs the delegated strategy's extracted search terms.
    let llm = TestHarness::builder().with_llm_resolver().build().await.unwrap();
    llm.seed_units("Classic T-Shirt", "Acme", "Tops", 19.99, 2, false)
        .await
        .unwrap();
    llm.provider.push_classification(
        r#"{"query_type": "product_search", "search_terms": ["shirt"]}"#,
    );
    let outcome = llm
        .service
        .chat("u-1", None, "do you have any shirts")
        .await
        .unwrap();
    assert_eq!(outcome.kind, "product_search");
    assert!(outcome.response_text.starts_with("Found 1 product(s):"));
    assert!(outcome.response_text.contains("Classic T-Shirt"));
}

#[tokio::test]
async fn statistics_aggregate_across_conversations() {
    let harness = TestHarness::builder().build().await.unwrap();
    let first = harness.service.chat("u-1", None, "hello").await.unwrap();
    harness
        .service
        .chat("u-1", Some(&first.conversation_id), "hello again")
        .await
        .unwrap();
    harness.service.chat("u-1", None, "new conversation").await.unwrap();

    let stats = harness.service.statistics("u-1").await.unwrap();
    assert_eq!(stats.total_conversations, 2);
    assert_eq!(stats.total_messages, 6);
    assert!((stats.avg_messages_per_conversation - 3.0).abs() < f64::EPSILON);
}
