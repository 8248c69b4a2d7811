//! Host sampling behind a trait, so diagnostics can run against a fixed
//! report in tests.

pub mod mock;
pub mod procfs;

use async_trait::async_trait;
use parley_protocol::SystemReport;

use crate::error::ToolResult;

pub use mock::MockHost;
pub use procfs::ProcfsHost;

/// Source of host diagnostics.
#[async_trait]
pub trait HostSampler: Send + Sync {
    /// Take one full sample of the host.
    async fn sample(&self) -> ToolResult<SystemReport>;
}
