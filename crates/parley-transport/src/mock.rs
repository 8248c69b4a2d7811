//! Mock transport for testing without a provider process.
//!
//! Replies are scripted per capability name and consumed in order; every
//! call is recorded for assertions.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use rmcp::model::{CallToolResult, Content};

use crate::error::{TransportError, TransportResult};
use crate::session::ToolTransport;

/// A recorded `call_tool` invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub name: String,
    pub arguments: Value,
}

type ScriptedReply = TransportResult<CallToolResult>;

/// Mock implementation of the `ToolTransport` trait.
///
/// A call with no scripted reply left fails like a provider that does not
/// know the tool.
pub struct MockTransport {
    replies: Mutex<HashMap<String, VecDeque<ScriptedReply>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn push(&self, name: &str, reply: ScriptedReply) {
        self.replies
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Queue a reply envelope for `name`.
    pub fn push_result(&self, name: &str, result: CallToolResult) {
        self.push(name, Ok(result));
    }

    /// Queue a structured reply, serialized the way the provider does.
    pub fn push_structured<T: Serialize>(&self, name: &str, value: &T) {
        let text = serde_json::to_string_pretty(value).expect("mock value must serialize");
        self.push_text(name, &text);
    }

    /// Queue a plain-text reply.
    pub fn push_text(&self, name: &str, text: &str) {
        self.push_result(name, CallToolResult::success(vec![Content::text(text)]));
    }

    /// Queue a reply the provider flagged as a tool error.
    pub fn push_tool_error(&self, name: &str, text: &str) {
        self.push_result(name, CallToolResult::error(vec![Content::text(text)]));
    }

    /// Queue an envelope with no content.
    pub fn push_empty(&self, name: &str) {
        self.push_result(name, CallToolResult::success(Vec::new()));
    }

    /// Queue a transport failure.
    pub fn push_error(&self, name: &str, error: TransportError) {
        self.push(name, Err(error));
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolTransport for MockTransport {
    async fn call_tool(&self, name: &str, arguments: Value) -> TransportResult<CallToolResult> {
        self.calls.lock().unwrap().push(RecordedCall {
            name: name.to_string(),
            arguments,
        });

        let next = self
            .replies
            .lock()
            .unwrap()
            .get_mut(name)
            .and_then(VecDeque::pop_front);

        next.unwrap_or_else(|| {
            Err(TransportError::Rpc {
                code: -32602,
                message: format!("unknown tool: {name}"),
            })
        })
    }
}
