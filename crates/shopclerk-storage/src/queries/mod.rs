// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query operations over the Shopclerk schema.

pub mod catalog;
pub mod conversations;
pub mod messages;

/// Current UTC time as an ISO-8601 string with millisecond precision.
pub(crate) fn now_iso() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Escape `%`, `_`, and `\` in a user-supplied fragment so it can be used
/// inside a `LIKE '%' || ? || '%' ESCAPE '\'` pattern as a literal.
pub(crate) fn escape_like(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
