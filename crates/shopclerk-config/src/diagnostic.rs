// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rich config diagnostics.
//!
//! Figment reports extraction failures as flat error values; this module
//! turns them into miette diagnostics that point at the offending line of
//! the TOML file and, for unknown keys, suggest the closest valid key.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A configuration error rendered to the operator.
///
/// Variants carry whatever context miette needs: source text and a span for
/// file-local problems, plain messages for everything else.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no config section defines.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(shopclerk::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest valid key, when one is similar enough to suggest.
        suggestion: Option<String>,
        /// Comma-joined valid keys for the section.
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong TOML type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(shopclerk::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A key the model requires but the merged config lacks.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(shopclerk::config::missing_key),
        help("add `{key} = <value>` to your shopclerk.toml")
    )]
    MissingKey { key: String },

    /// A structurally valid value rejected by semantic validation.
    #[error("validation error: {message}")]
    #[diagnostic(code(shopclerk::config::validation))]
    Validation { message: String },

    /// Anything figment reports that has no dedicated variant.
    #[error("configuration error: {0}")]
    #[diagnostic(code(shopclerk::config::other))]
    Other(String),
}

/// Render diagnostics to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut rendered = String::new();
        if handler
            .render_report(&mut rendered, error as &dyn Diagnostic)
            .is_ok()
        {
            eprint!("{rendered}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

/// Convert a `figment::Error` into `ConfigError` diagnostics.
///
/// A single figment error can hold several failures; each becomes its own
/// diagnostic. `toml_sources` pairs config file paths with their contents so
/// unknown-key errors can carry a span into the file they came from.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => {
                let valid_keys: Vec<&str> = expected.to_vec();
                let (span, src) = locate_in_sources(&error, field, toml_sources);
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion: suggest_key(field, &valid_keys),
                    valid_keys: valid_keys.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: field.clone().into_owned(),
            },
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: joined_path(&error),
                detail: format!("found {actual}, expected {expected}"),
                expected: expected.to_string(),
                span: None,
                src: None,
            },
            _ => ConfigError::Other(format!("{error}")),
        })
        .collect()
}

/// Minimum Jaro-Winkler similarity before a key is offered as a suggestion.
/// 0.75 admits one-edit typos like `databse_path` without suggesting keys
/// that share nothing but a prefix.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Pick the valid key most similar to `unknown`, if any clears the threshold.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Locate `field` in whichever config file figment attributes the error to.
fn locate_in_sources(
    error: &figment::error::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let attributed_path = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    let Some(attributed_path) = attributed_path else {
        return (None, None);
    };
    let Some((path, content)) = toml_sources
        .iter()
        .find(|(p, _)| *p == attributed_path)
        .map(|(p, c)| (p.as_str(), c.as_str()))
    else {
        return (None, None);
    };

    let section: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
    match find_key_offset(content, &section, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(path, content.to_string())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `field` within `content`, scoped to the `[section]` named
/// by the error path (top-level fields search from the start of the file).
///
/// Only a key position counts: the field name must open a line and be
/// followed by `=` or whitespace, so a matching substring inside a value
/// never produces a span.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let section_start = match path.first() {
        None => 0,
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header)? + header.len()
        }
    };

    let mut offset = section_start;
    for line in content[section_start..].split_inclusive('\n') {
        let key = line.trim_start();
        if let Some(rest) = key.strip_prefix(field)
            && (rest.starts_with('=') || rest.starts_with(' ') || rest.starts_with('\t'))
        {
            return Some(offset + (line.len() - key.len()));
        }
        offset += line.len();
    }

    None
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(key) => format!("did you mean `{key}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

fn joined_path(error: &figment::error::Error) -> String {
    error
        .path
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggest_databse_path_for_database_path() {
        let valid = &["database_path", "wal_mode"];
        assert_eq!(
            suggest_key("databse_path", valid),
            Some("database_path".to_string())
        );
    }

    #[test]
    fn suggest_api_kye_for_api_key() {
        let valid = &["api_key", "model", "max_tokens", "base_url"];
        assert_eq!(suggest_key("api_kye", valid), Some("api_key".to_string()));
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["name", "log_level", "resolver"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn find_key_offset_in_section() {
        let content = "[storage]\ndatabse_path = \"/tmp/x.db\"\n";
        let path = vec!["storage".to_string()];
        let offset = find_key_offset(content, &path, "databse_path").unwrap();
        assert_eq!(&content[offset..offset + 12], "databse_path");
    }

    #[test]
    fn find_key_offset_ignores_matches_inside_values() {
        // "port" appears in a value before it appears as a key.
        let content = "[gateway]\nbind_address = \"port-forward.local\"\nport = 8080\n";
        let path = vec!["gateway".to_string()];
        let offset = find_key_offset(content, &path, "port").unwrap();
        assert_eq!(&content[offset..offset + 4], "port");
        assert!(content[offset..].starts_with("port = 8080"));
    }

    #[test]
    fn unknown_field_becomes_unknown_key_error() {
        let err = crate::loader::load_config_from_str(
            r#"
[agent]
resolvr = "rules"
"#,
        )
        .unwrap_err();
        let errors = figment_to_config_errors(err, &[]);
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigError::UnknownKey { key, suggestion, .. }
                if key == "resolvr" && suggestion.as_deref() == Some("resolver")
        )));
    }
}
