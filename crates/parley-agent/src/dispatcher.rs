//! Turn dispatcher — segment, classify, extract, invoke, decode, render.
//!
//! Every clause yields exactly one reply string, including clauses whose
//! argument is missing or whose tool call failed. Only fatal transport
//! errors (the provider is gone) abort a turn.

use std::time::Instant;

use parley_protocol::{Capability, ToolRequest};
use parley_transport::{ToolTransport, TransportError, TransportResult};
use rmcp::model::Tool;

use crate::decode::{ToolReply, decode};
use crate::extract::{self, Focus};
use crate::intent::{Intent, classify};
use crate::render;
use crate::segment::segment;
use crate::state::ConversationState;

/// Result of one tool invocation that did not kill the session.
enum Invocation {
    Reply(ToolReply),
    Failed(TransportError),
}

/// Resolves user turns against a tool transport.
pub struct Dispatcher<'a> {
    transport: &'a dyn ToolTransport,
    state: ConversationState,
}

impl<'a> Dispatcher<'a> {
    pub fn new(transport: &'a dyn ToolTransport) -> Self {
        Self {
            transport,
            state: ConversationState::new(),
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Resolve one utterance into the joined reply for the turn.
    ///
    /// Clauses run strictly in order. An utterance with no clauses yields
    /// an empty string.
    pub async fn handle_turn(&mut self, utterance: &str) -> TransportResult<String> {
        let mut replies = Vec::new();
        for clause in segment(utterance) {
            replies.push(self.handle_clause(clause).await?);
        }
        Ok(replies.join(render::CLAUSE_SEPARATOR))
    }

    /// Resolve a single clause.
    pub async fn handle_clause(&mut self, clause: &str) -> TransportResult<String> {
        let intent = classify(clause);
        tracing::debug!(clause, intent = ?intent, "classified clause");

        let reply = match intent {
            Intent::Greeting => render::GREETING.to_string(),

            Intent::SetName => match extract::name(clause) {
                Some(name) => {
                    let line = render::name_set(&name);
                    self.state.set_user_name(name);
                    line
                }
                None => render::name_query(self.state.user_name()),
            },

            Intent::QueryName => render::name_query(self.state.user_name()),

            Intent::Weather => {
                let Some(city) = extract::city(clause) else {
                    return Ok(render::MISSING_CITY.to_string());
                };
                match self.invoke(ToolRequest::weather(city.as_str())).await? {
                    Invocation::Reply(reply) => render::weather(&city, &reply),
                    Invocation::Failed(e) => render::tool_failed(Capability::GetWeather, &e),
                }
            }

            Intent::VowelCount => {
                let Some(word) = extract::vowel_text(clause) else {
                    return Ok(render::MISSING_WORD.to_string());
                };
                match self.invoke(ToolRequest::count_vowels(word.as_str())).await? {
                    Invocation::Reply(reply) => render::vowels(&word, &reply),
                    Invocation::Failed(e) => render::tool_failed(Capability::CountVowels, &e),
                }
            }

            Intent::SystemDiagnostics => {
                let focus = Focus::from_clause(clause);
                let request = ToolRequest::system_diagnostics(extract::diagnostics_detail(clause));
                match self.invoke(request).await? {
                    Invocation::Reply(reply) => render::diagnostics(focus, &reply),
                    Invocation::Failed(e) => {
                        render::tool_failed(Capability::SystemDiagnostics, &e)
                    }
                }
            }

            Intent::Unknown => render::UNSUPPORTED.to_string(),
        };

        Ok(reply)
    }

    /// Call the provider. Fatal errors propagate; anything else is folded
    /// into the clause's reply.
    async fn invoke(&self, request: ToolRequest) -> TransportResult<Invocation> {
        let tool = request.capability;
        let start = Instant::now();
        let result = self
            .transport
            .call_tool(tool.as_str(), request.arguments)
            .await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(envelope) => {
                tracing::info!(tool = %tool, latency_ms, "tool replied");
                Ok(Invocation::Reply(decode(&envelope)))
            }
            Err(e) if e.is_fatal() => {
                tracing::error!(tool = %tool, error = %e, "tool provider connection lost");
                Err(e)
            }
            Err(e) => {
                tracing::warn!(tool = %tool, latency_ms, error = %e, "tool call failed");
                Ok(Invocation::Failed(e))
            }
        }
    }
}

/// Capabilities the agent routes to that the provider did not advertise.
pub fn missing_capabilities(advertised: &[Tool]) -> Vec<Capability> {
    Capability::ALL
        .into_iter()
        .filter(|cap| !advertised.iter().any(|t| t.name == cap.as_str()))
        .collect()
}
