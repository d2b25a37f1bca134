// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test fixtures for the Shopclerk workspace.
//!
//! Provides [`MockChatProvider`] for deterministic provider behavior and
//! [`TestHarness`] for driving the full pipeline against a temp database.

pub mod harness;
pub mod mock_provider;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_provider::MockChatProvider;
