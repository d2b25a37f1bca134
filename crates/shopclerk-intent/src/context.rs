// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering of the conversation context window for the classifier.

use shopclerk_core::StoredMessage;

/// Render a context window as the plain-text transcript the classification
/// prompt expects. An empty window renders as an empty string, not an empty
/// transcript header.
pub fn render_context(messages: &[StoredMessage]) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let mut out = String::from("Previous conversation:\n");
    for msg in messages {
        let role = if msg.role == "user" { "User" } else { "Assistant" };
        out.push_str(role);
        out.push_str(": ");
        out.push_str(&msg.content);
        out.push('\n');
    }
    out
}
