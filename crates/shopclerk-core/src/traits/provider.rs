// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider trait for the external classification and generation functions.

use async_trait::async_trait;

use crate::error::ClerkError;

/// The external LLM used for delegated intent classification and optional
/// response generation.
///
/// Both calls are blocking, fallible remote calls. Callers never propagate a
/// provider failure to the end user: classification failures degrade to an
/// "unclear" intent and generation failures degrade to a canned apology.
/// Returned text is untrusted; `classify` output in particular must be
/// schema-validated before any field is used.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Ask the model to classify a raw query given rendered conversation
    /// context. Returns the model's raw text output (expected to be JSON).
    async fn classify(&self, query: &str, context: &str) -> Result<String, ClerkError>;

    /// Ask the model to compose prose from grounding data under a fixed
    /// system instruction. Returns plain text.
    async fn generate(
        &self,
        system_instruction: &str,
        user_message: &str,
    ) -> Result<String, ClerkError>;
}
