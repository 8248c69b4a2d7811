//! Fixed-report host for tests.

use async_trait::async_trait;

use parley_protocol::SystemReport;

use crate::error::{ToolError, ToolResult};
use crate::system::HostSampler;

pub struct MockHost {
    report: Option<SystemReport>,
}

impl MockHost {
    pub fn new(report: SystemReport) -> Self {
        Self {
            report: Some(report),
        }
    }

    /// A host whose every sample fails.
    pub fn failing() -> Self {
        Self { report: None }
    }

    /// A plausible small VM.
    pub fn sample_report() -> SystemReport {
        SystemReport {
            hostname: "edge-01".into(),
            ip_address: "10.0.0.12".into(),
            os: "Linux".into(),
            os_version: "#1 SMP PREEMPT_DYNAMIC".into(),
            architecture: "x86_64".into(),
            cpu_physical_cores: 4,
            cpu_logical_cores: 8,
            cpu_usage_percent: 12.5,
            cpu_frequency_mhz: 2400.0,
            memory_total_gb: 15.5,
            memory_used_gb: 6.25,
            memory_free_gb: 9.25,
            memory_usage_percent: 40.3,
            disk_total_gb: 250.0,
            disk_used_gb: 100.0,
            disk_free_gb: 150.0,
            disk_usage_percent: 40.0,
            system_uptime_hours: 72.5,
            running_in_vm: true,
        }
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new(Self::sample_report())
    }
}

#[async_trait]
impl HostSampler for MockHost {
    async fn sample(&self) -> ToolResult<SystemReport> {
        self.report
            .clone()
            .ok_or_else(|| ToolError::Sampling("mock host configured to fail".into()))
    }
}
