// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Shopclerk support service.
//!
//! Layered TOML loading via Figment (XDG hierarchy plus `SHOPCLERK_`
//! environment variables), strict unknown-key rejection, semantic
//! validation, and miette diagnostics with typo suggestions.

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, figment_to_config_errors, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{AgentConfig, ClerkConfig, GatewayConfig, GroqConfig, ResolverMode, StorageConfig};
pub use validation::validate_config;

use std::path::PathBuf;

/// Load configuration from the standard hierarchy, then validate it.
///
/// All structural and semantic errors are collected into `ConfigError`
/// diagnostics suitable for [`render_errors`].
pub fn load_and_validate() -> Result<ClerkConfig, Vec<ConfigError>> {
    let config = match loader::load_config() {
        Ok(c) => c,
        Err(e) => {
            let sources = collect_toml_sources();
            return Err(figment_to_config_errors(e, &sources));
        }
    };
    validation::validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a TOML string, then validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<ClerkConfig, Vec<ConfigError>> {
    let config = match loader::load_config_from_str(toml_content) {
        Ok(c) => c,
        Err(e) => return Err(figment_to_config_errors(e, &[])),
    };
    validation::validate_config(&config)?;
    Ok(config)
}

/// Read the contents of every config file in the lookup hierarchy that
/// exists, for use as diagnostic source text.
pub fn collect_toml_sources() -> Vec<(String, String)> {
    let mut candidates: Vec<PathBuf> = vec![PathBuf::from("/etc/shopclerk/shopclerk.toml")];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("shopclerk/shopclerk.toml"));
    }
    candidates.push(PathBuf::from("shopclerk.toml"));

    candidates
        .into_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            Some((path.display().to_string(), content))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_and_validate_str_accepts_good_config() {
        let config = load_and_validate_str(
            r#"
[agent]
resolver = "llm"

[groq]
api_key = "gsk-test"
"#,
        )
        .unwrap();
        assert_eq!(config.agent.resolver, ResolverMode::Llm);
    }

    #[test]
    fn load_and_validate_str_reports_semantic_errors() {
        let errors = load_and_validate_str(
            r#"
[agent]
log_level = "shout"
"#,
        )
        .unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("log_level")));
    }

    #[test]
    fn load_and_validate_str_reports_structural_errors() {
        let errors = load_and_validate_str(
            r#"
[gateway]
prot = 8080
"#,
        )
        .unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, ConfigError::UnknownKey { key, .. } if key == "prot"))
        );
    }
}
