// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat provider for deterministic testing.
//!
//! `MockChatProvider` implements `ChatProvider` with pre-configured answers,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use shopclerk_core::{ChatProvider, ClerkError};

/// A mock provider that returns pre-configured classification and generation
/// answers.
///
/// Answers are popped from per-method FIFO queues. When a queue is empty,
/// the call succeeds with a default "mock response" text. Failures can be
/// queued too, to exercise the degradation paths.
pub struct MockChatProvider {
    classifications: Mutex<VecDeque<Result<String, String>>>,
    generations: Mutex<VecDeque<Result<String, String>>>,
}

impl MockChatProvider {
    /// Create a mock provider with empty queues.
    pub fn new() -> Self {
        Self {
            classifications: Mutex::new(VecDeque::new()),
            generations: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue a classification answer.
    pub fn push_classification(&self, raw: &str) {
        self.classifications
            .lock()
            .unwrap()
            .push_back(Ok(raw.to_string()));
    }

    /// Queue a classification transport failure.
    pub fn push_classification_failure(&self, message: &str) {
        self.classifications
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    /// Queue a generation answer.
    pub fn push_generation(&self, text: &str) {
        self.generations
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
    }

    /// Queue a generation transport failure.
    pub fn push_generation_failure(&self, message: &str) {
        self.generations
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    fn next(queue: &Mutex<VecDeque<Result<String, String>>>) -> Result<String, ClerkError> {
        match queue.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(ClerkError::Provider {
                message,
                source: None,
            }),
            None => Ok("mock response".to_string()),
        }
    }
}

impl Default for MockChatProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn classify(&self, _query: &str, _context: &str) -> Result<String, ClerkError> {
        Self::next(&self.classifications)
    }

    async fn generate(
        &self,
        _system_instruction: &str,
        _user_message: &str,
    ) -> Result<String, ClerkError> {
        Self::next(&self.generations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queues_are_independent_and_fifo() {
        let provider = MockChatProvider::new();
        provider.push_classification("first");
        provider.push_classification("second");
        provider.push_generation("generated");

        assert_eq!(provider.classify("q", "").await.unwrap(), "first");
        assert_eq!(provider.classify("q", "").await.unwrap(), "second");
        assert_eq!(provider.generate("sys", "user").await.unwrap(), "generated");
    }

    #[tokio::test]
    async fn empty_queue_yields_default_response() {
        let provider = MockChatProvider::new();
        assert_eq!(provider.classify("q", "").await.unwrap(), "mock response");
        assert_eq!(provider.generate("s", "u").await.unwrap(), "mock response");
    }

    #[tokio::test]
    async fn queued_failure_surfaces_as_provider_error() {
        let provider = MockChatProvider::new();
        provider.push_generation_failure("timeout");
        let err = provider.generate("s", "u").await.unwrap_err();
        assert!(matches!(err, ClerkError::Provider { .. }));
        assert!(err.to_string().contains("timeout"));
    }
}
