//! Transport session to the Parley tool provider.
//!
//! - `ToolTransport` trait for invoking capabilities (mockable in tests)
//! - `StdioSession`: one long-lived provider process spoken to as an MCP
//!   client (`rmcp`) over its stdin/stdout
//! - `MockTransport`: scripted replies for tests without a provider
//! - `SessionConfig`: command line and timeouts

pub mod config;
pub mod error;
pub mod mock;
pub mod session;

pub use config::SessionConfig;
pub use error::{TransportError, TransportResult};
pub use mock::{MockTransport, RecordedCall};
pub use session::{StdioSession, ToolTransport};
