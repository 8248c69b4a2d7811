//! Capabilities served by the Parley tool provider.
//!
//! Provides a `HostSampler` abstraction for host diagnostics (procfs on
//! Linux, a fixed report for tests) and the three tool bodies:
//! get_weather, count_vowels, system_diagnostics. The MCP surface lives in
//! the provider crate.

pub mod error;
pub mod system;
pub mod tools;

pub use error::{ToolError, ToolResult};
pub use system::{HostSampler, MockHost, ProcfsHost};
pub use tools::{GetWeather, SystemDiagnostics, count_vowels, weather::WeatherConfig};
