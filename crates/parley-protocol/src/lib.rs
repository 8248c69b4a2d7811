//! Records shared by the Parley agent and its tool provider.
//!
//! The MCP framing itself comes from `rmcp`; this crate only pins down the
//! capability names and the shape of each capability's arguments and
//! results.

pub mod capability;

pub use capability::*;
