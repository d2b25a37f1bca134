// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Shopclerk support service.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the Shopclerk workspace. The storage,
//! provider, and pipeline crates all implement or consume traits defined
//! here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ClerkError;
pub use types::{
    Classification, Conversation, ConversationStats, ConversationSummary, DataResult, IntentKind,
    InventoryUnit, OrderRecord, QueryIntent, Reply, ResolvedIntent, Role, StoredMessage,
};

// Re-export the adapter traits at crate root.
pub use traits::{CatalogStore, ChatProvider, ConversationStore};
