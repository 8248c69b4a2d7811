//! Result decoding: reply envelope → `ToolReply`.
//!
//! Text fragments are joined with newlines, trimmed, and parsed as a JSON
//! object. Anything that is not an object comes back as `Raw` (trimmed);
//! decoding never fails.

use rmcp::model::CallToolResult;
use serde_json::{Map, Value};

/// Shape of a tool's answer, decided at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolReply {
    /// A keyed record.
    Structured(Map<String, Value>),
    /// Text that did not parse as a record (degraded or error reply).
    Raw(String),
    /// An envelope with no text content.
    Empty,
}

/// Normalize an envelope.
pub fn decode(envelope: &CallToolResult) -> ToolReply {
    let parts: Vec<&str> = envelope
        .content
        .iter()
        .filter_map(|c| c.as_text().map(|t| t.text.as_str()))
        .collect();
    if parts.is_empty() {
        return ToolReply::Empty;
    }

    let text = parts.join("\n");
    let text = text.trim();
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => ToolReply::Structured(map),
        _ => ToolReply::Raw(text.to_string()),
    }
}
