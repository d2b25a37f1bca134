// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./shopclerk.toml` > `~/.config/shopclerk/shopclerk.toml`
//! > `/etc/shopclerk/shopclerk.toml` with environment variable overrides via
//! the `SHOPCLERK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ClerkConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/shopclerk/shopclerk.toml` (system-wide)
/// 3. `~/.config/shopclerk/shopclerk.toml` (user XDG config)
/// 4. `./shopclerk.toml` (local directory)
/// 5. `SHOPCLERK_*` environment variables
pub fn load_config() -> Result<ClerkConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<ClerkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ClerkConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ClerkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ClerkConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for
/// diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ClerkConfig::default()))
        .merge(Toml::file("/etc/shopclerk/shopclerk.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("shopclerk/shopclerk.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("shopclerk.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `SHOPCLERK_GROQ_API_KEY` must map to
/// `groq.api_key`, not `groq.api.key`.
fn env_provider() -> Env {
    Env::prefixed("SHOPCLERK_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: SHOPCLERK_GROQ_API_KEY -> "groq_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("groq_", "groq.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResolverMode;

    #[test]
    fn loads_defaults_from_empty_string() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.agent.name, "shopclerk");
    }

    #[test]
    fn toml_string_overrides_defaults() {
        let config = load_config_from_str(
            r#"
[agent]
resolver = "llm"
context_window_turns = 10

[gateway]
port = 9000
"#,
        )
        .unwrap();
        assert_eq!(config.agent.resolver, ResolverMode::Llm);
        assert_eq!(config.agent.context_window_turns, 10);
        assert_eq!(config.gateway.port, 9000);
        // Untouched sections keep defaults.
        assert_eq!(config.groq.model, "llama3-8b-8192");
    }

    #[test]
    fn unknown_key_fails_extraction() {
        let result = load_config_from_str(
            r#"
[storage]
databse_path = "/tmp/typo.db"
"#,
        );
        assert!(result.is_err());
    }
}
