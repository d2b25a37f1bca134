// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent resolution for the Shopclerk support service.
//!
//! Two interchangeable strategies implement [`IntentResolver`]: the
//! deterministic [`RuleResolver`] (ordered keyword/regex rules, no external
//! calls) and the delegated [`LlmResolver`] (remote classification with
//! schema validation and graceful degradation). Both produce the same
//! `QueryIntent` contract, so the rest of the pipeline never knows which one
//! is configured.

pub mod context;
pub mod delegated;
pub mod rules;

pub use context::render_context;
pub use delegated::LlmResolver;
pub use rules::RuleResolver;

use async_trait::async_trait;
use shopclerk_core::{QueryIntent, StoredMessage};

/// Resolves a raw user query into a classified intent.
///
/// Resolution never fails: malformed input, remote failures, and invalid
/// classification payloads all degrade to an `unclear` intent.
#[async_trait]
pub trait IntentResolver: Send + Sync {
    async fn resolve(&self, query: &str, context_window: &[StoredMessage]) -> QueryIntent;
}
