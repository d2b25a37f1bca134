// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query-resolution pipeline for the Shopclerk support service.
//!
//! [`ChatService`] wires the pipeline together: conversation context fetch,
//! intent resolution, data orchestration, response composition, and
//! persistence of both turns.

pub mod composer;
pub mod conversations;
pub mod orchestrator;
pub mod service;

pub use composer::ResponseComposer;
pub use conversations::ConversationManager;
pub use orchestrator::DataOrchestrator;
pub use service::{ChatOutcome, ChatService};
