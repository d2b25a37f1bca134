// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the seams of the pipeline.
//!
//! Every component takes its collaborators through these traits, so the
//! SQLite store can be swapped for an in-memory fake and the remote LLM for
//! a queued mock in tests.

pub mod catalog;
pub mod conversations;
pub mod provider;

pub use catalog::CatalogStore;
pub use conversations::ConversationStore;
pub use provider::ChatProvider;
