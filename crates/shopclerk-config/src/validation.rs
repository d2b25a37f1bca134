// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic validation of loaded configuration.
//!
//! Figment and serde catch structural problems (unknown keys, wrong types);
//! this module checks the values themselves and returns every violation in
//! one pass so the operator can fix the file once.

use std::net::IpAddr;

use crate::diagnostic::ConfigError;
use crate::model::{ClerkConfig, ResolverMode};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a loaded configuration, collecting all violations.
///
/// Returns `Ok(())` when the config is usable, or every validation error
/// found so they can be rendered together.
pub fn validate_config(config: &ClerkConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !VALID_LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level `{}` is not one of: {}",
                config.agent.log_level,
                VALID_LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.agent.context_window_turns < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.context_window_turns must be at least 1, got {}",
                config.agent.context_window_turns
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.gateway.bind_address.parse::<IpAddr>().is_err() {
        errors.push(ConfigError::Validation {
            message: format!(
                "gateway.bind_address `{}` is not a valid IP address",
                config.gateway.bind_address
            ),
        });
    }

    // The delegated resolver and the generation stage both call the Groq API.
    let needs_api_key = config.agent.resolver == ResolverMode::Llm || config.agent.use_generation;
    if needs_api_key && config.groq.api_key.as_deref().unwrap_or("").is_empty() {
        errors.push(ConfigError::Validation {
            message: "groq.api_key is required when agent.resolver is \"llm\" or \
                      agent.use_generation is enabled"
                .to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
