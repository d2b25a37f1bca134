// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Shopclerk support service.

use thiserror::Error;

/// The primary error type used across all Shopclerk adapter traits and core operations.
///
/// The variants follow the service's failure taxonomy: input problems are
/// rejected before the pipeline runs, missing entities surface as `NotFound`,
/// upstream LLM failures are absorbed into fallback replies by their callers,
/// and only storage failures are allowed to fail an entire request.
#[derive(Debug, Error)]
pub enum ClerkError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// LLM provider errors (API failure, invalid payload, connection error).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Request rejected before entering the pipeline (empty message, bad parameters).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced entity does not exist.
    #[error("{what} not found: {id}")]
    NotFound { what: String, id: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ClerkError {
    /// Shorthand for a `NotFound` error.
    pub fn not_found(what: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            what: what.into(),
            id: id.into(),
        }
    }
}
