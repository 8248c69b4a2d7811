//! Parley tool provider — library crate.
//!
//! Exposes the `ParleyProvider` MCP service and its stdio `serve` loop so
//! tests (and `parley-e2e-tests`) can run the provider in-process over
//! duplex pipes.

pub mod config;
pub mod server;

pub use config::ProviderConfig;
pub use server::{ParleyProvider, SERVER_NAME, serve};
