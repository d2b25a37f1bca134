// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Shopclerk support service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Shopclerk configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClerkConfig {
    /// Service identity and pipeline behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Groq API settings for the delegated classifier/generator.
    #[serde(default)]
    pub groq: GroqConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Which intent-resolution strategy the pipeline uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverMode {
    /// Deterministic keyword/regex rules, no external calls.
    Rules,
    /// Delegated classification via the Groq provider.
    Llm,
}

/// Service identity and pipeline behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the service.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Intent-resolution strategy. Both strategies produce the same
    /// `QueryIntent` contract, so the rest of the pipeline is agnostic.
    #[serde(default = "default_resolver")]
    pub resolver: ResolverMode,

    /// Number of recent messages fed to the delegated classifier as context.
    #[serde(default = "default_context_window")]
    pub context_window_turns: i64,

    /// Whether to run the delegated generation stage on composed replies.
    /// When false, the deterministic formatting is returned directly.
    #[serde(default)]
    pub use_generation: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            resolver: default_resolver(),
            context_window_turns: default_context_window(),
            use_generation: false,
        }
    }
}

fn default_agent_name() -> String {
    "shopclerk".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_resolver() -> ResolverMode {
    ResolverMode::Rules
}

fn default_context_window() -> i64 {
    6
}

/// Groq API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GroqConfig {
    /// Groq API key. `None` disables the delegated resolver and generation.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier for classification and generation requests.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// API base URL (overridable for tests and proxies).
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            base_url: default_base_url(),
        }
    }
}

fn default_model() -> String {
    "llama3-8b-8192".to_string()
}

fn default_max_tokens() -> u32 {
    800
}

fn default_base_url() -> String {
    "https://api.groq.com".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("shopclerk").join("shopclerk.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "shopclerk.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// TCP port for the HTTP listener.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}
