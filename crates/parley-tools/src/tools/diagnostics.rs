//! system_diagnostics — one full sample of the local host.

use parley_protocol::SystemReport;

use crate::error::ToolResult;
use crate::system::HostSampler;

pub struct SystemDiagnostics {
    host: Box<dyn HostSampler>,
}

impl SystemDiagnostics {
    pub fn new(host: Box<dyn HostSampler>) -> Self {
        Self { host }
    }

    /// Sample the host. `detail` is what the user asked about; it is only
    /// logged.
    pub async fn sample(&self, detail: &str) -> ToolResult<SystemReport> {
        tracing::debug!(detail, "sampling host");
        self.host.sample().await
    }
}
