//! Parley agent — library crate.
//!
//! Turns a line of user input into replies: segment into clauses, classify
//! each clause, extract arguments, call the tool provider through a
//! `ToolTransport`, decode and render. The `parley` binary wires this to
//! stdin/stdout and a spawned provider; `parley-e2e-tests` drives it
//! in-process.

pub mod config;
pub mod decode;
pub mod dispatcher;
pub mod extract;
pub mod intent;
pub mod render;
pub mod repl;
pub mod segment;
pub mod state;

pub use config::{AgentConfig, ConfigError};
pub use decode::{ToolReply, decode};
pub use dispatcher::Dispatcher;
pub use intent::{Intent, classify};
pub use repl::ReplExit;
pub use segment::segment;
pub use state::ConversationState;
