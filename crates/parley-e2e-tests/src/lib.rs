//! End-to-end tests for Parley live under `tests/`.
//!
//! The agent's `Dispatcher` talks to an in-process `ParleyProvider` over
//! `tokio::io::duplex` pipes, so every call crosses the real MCP framing,
//! the handshake, and the tool implementations. The weather API is a
//! `wiremock` server and host sampling uses `MockHost`.
