//! Host sampling from procfs plus `df` for the disk.
//!
//! Everything is read from text files under `/proc` (overridable for
//! tests). Failure to read the CPU or memory counters fails the sample;
//! peripheral fields (IP address, frequency, disk) degrade to placeholders.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

use parley_protocol::SystemReport;

use crate::error::{ToolError, ToolResult};
use crate::system::HostSampler;

/// Interval between the two `/proc/stat` reads used for CPU usage.
const CPU_SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Upper bound for the `df` invocation.
const DF_TIMEOUT: Duration = Duration::from_secs(5);

const KIB_PER_GIB: f64 = 1024.0 * 1024.0;

const VM_MARKERS: &[&str] = &["virtual", "vmware", "kvm", "hyper-v", "xen"];

pub struct ProcfsHost {
    proc_root: PathBuf,
    disk_path: String,
    cpu_interval: Duration,
}

impl ProcfsHost {
    /// Sample the live host; disk usage is reported for the filesystem
    /// holding `disk_path`.
    pub fn new(disk_path: impl Into<String>) -> Self {
        Self {
            proc_root: PathBuf::from("/proc"),
            disk_path: disk_path.into(),
            cpu_interval: CPU_SAMPLE_INTERVAL,
        }
    }

    pub fn with_proc_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.proc_root = root.into();
        self
    }

    pub fn with_cpu_interval(mut self, interval: Duration) -> Self {
        self.cpu_interval = interval;
        self
    }

    async fn read(&self, rel: &str) -> ToolResult<String> {
        let path = self.proc_root.join(rel);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ToolError::Sampling(format!("{}: {e}", path.display())))
    }

    async fn read_or_default(&self, rel: &str) -> String {
        self.read(rel)
            .await
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    async fn cpu_usage(&self) -> ToolResult<f64> {
        let parse = |stat: String| {
            parse_cpu_times(&stat)
                .ok_or_else(|| ToolError::Sampling("no aggregate cpu line in stat".into()))
        };
        let before = parse(self.read("stat").await?)?;
        tokio::time::sleep(self.cpu_interval).await;
        let after = parse(self.read("stat").await?)?;
        Ok(round1(before.usage_until(&after)))
    }

    async fn disk_usage(&self) -> DiskUsage {
        let run = Command::new("df")
            .args(["-kP", &self.disk_path])
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(DF_TIMEOUT, run).await {
            Ok(Ok(output)) if output.status.success() => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                parse_df(&stdout).unwrap_or_else(|| {
                    tracing::warn!(path = %self.disk_path, "unrecognised df output");
                    DiskUsage::default()
                })
            }
            Ok(Ok(output)) => {
                tracing::warn!(
                    path = %self.disk_path,
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "df failed"
                );
                DiskUsage::default()
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "could not run df");
                DiskUsage::default()
            }
            Err(_) => {
                tracing::warn!(secs = DF_TIMEOUT.as_secs(), "df timed out");
                DiskUsage::default()
            }
        }
    }
}

#[async_trait]
impl HostSampler for ProcfsHost {
    async fn sample(&self) -> ToolResult<SystemReport> {
        let cpuinfo = parse_cpuinfo(&self.read("cpuinfo").await.unwrap_or_default());
        let cpu_usage_percent = self.cpu_usage().await?;

        let meminfo = self.read("meminfo").await?;
        let mem = parse_meminfo(&meminfo)
            .ok_or_else(|| ToolError::Sampling("MemTotal/MemAvailable missing".into()))?;

        let disk = self.disk_usage().await;

        let uptime_secs = parse_uptime(&self.read_or_default("uptime").await).unwrap_or(0.0);
        let osrelease = self.read_or_default("sys/kernel/osrelease").await;

        let hostname = match self.read_or_default("sys/kernel/hostname").await {
            h if h.is_empty() => "unknown".to_string(),
            h => h,
        };

        Ok(SystemReport {
            hostname,
            ip_address: primary_ip().await,
            os: os_family(std::env::consts::OS),
            os_version: self.read_or_default("sys/kernel/version").await,
            architecture: std::env::consts::ARCH.to_string(),
            cpu_physical_cores: cpuinfo.physical_cores,
            cpu_logical_cores: cpuinfo.logical_cores,
            cpu_usage_percent,
            cpu_frequency_mhz: round2(cpuinfo.frequency_mhz),
            memory_total_gb: kib_to_gib(mem.total_kb),
            memory_used_gb: kib_to_gib(mem.used_kb()),
            memory_free_gb: kib_to_gib(mem.available_kb),
            memory_usage_percent: round1(percent(mem.used_kb(), mem.total_kb)),
            disk_total_gb: kib_to_gib(disk.total_kb),
            disk_used_gb: kib_to_gib(disk.used_kb),
            disk_free_gb: kib_to_gib(disk.available_kb),
            disk_usage_percent: round1(percent(disk.used_kb, disk.used_kb + disk.available_kb)),
            system_uptime_hours: round2(uptime_secs / 3600.0),
            running_in_vm: looks_virtual(&osrelease) || cpuinfo.hypervisor,
        })
    }
}

/// Local address of the interface that routes to the internet.
///
/// Connecting a UDP socket sends nothing; it only resolves the route.
async fn primary_ip() -> String {
    let route = async {
        let socket = tokio::net::UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect("8.8.8.8:80").await?;
        socket.local_addr()
    };
    match route.await {
        Ok(addr) => addr.ip().to_string(),
        Err(e) => {
            tracing::debug!(error = %e, "no routable address");
            "Unavailable".to_string()
        }
    }
}

fn os_family(os: &str) -> String {
    match os {
        "linux" => "Linux".into(),
        "macos" => "Darwin".into(),
        "windows" => "Windows".into(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

fn looks_virtual(osrelease: &str) -> bool {
    let release = osrelease.to_lowercase();
    VM_MARKERS.iter().any(|m| release.contains(m))
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn kib_to_gib(kib: u64) -> f64 {
    round2(kib as f64 / KIB_PER_GIB)
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

// ── Parsers ───────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq)]
struct CpuInfo {
    logical_cores: u32,
    physical_cores: u32,
    frequency_mhz: f64,
    hypervisor: bool,
}

/// Core counts, mean clock and the hypervisor flag from `/proc/cpuinfo`.
///
/// Physical cores are distinct (physical id, core id) pairs; kernels that
/// omit those fields (most ARM boards) report logical cores instead.
fn parse_cpuinfo(text: &str) -> CpuInfo {
    let mut logical = 0u32;
    let mut cores = HashSet::new();
    let mut mhz = Vec::new();
    let mut hypervisor = false;

    for block in text.split("\n\n") {
        let mut physical_id = None;
        let mut core_id = None;
        let mut is_processor = false;

        for line in block.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "processor" => is_processor = true,
                "physical id" => physical_id = Some(value.to_string()),
                "core id" => core_id = Some(value.to_string()),
                "cpu MHz" => {
                    if let Ok(v) = value.parse::<f64>() {
                        mhz.push(v);
                    }
                }
                "flags" => {
                    if value.split_whitespace().any(|f| f == "hypervisor") {
                        hypervisor = true;
                    }
                }
                _ => {}
            }
        }

        if is_processor {
            logical += 1;
            if let (Some(p), Some(c)) = (physical_id, core_id) {
                cores.insert((p, c));
            }
        }
    }

    let physical_cores = if cores.is_empty() {
        logical
    } else {
        cores.len() as u32
    };
    let frequency_mhz = if mhz.is_empty() {
        0.0
    } else {
        mhz.iter().sum::<f64>() / mhz.len() as f64
    };

    CpuInfo {
        logical_cores: logical,
        physical_cores,
        frequency_mhz,
        hypervisor,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CpuTimes {
    idle: u64,
    total: u64,
}

impl CpuTimes {
    /// Busy share of the interval between `self` and `later`, in percent.
    fn usage_until(&self, later: &CpuTimes) -> f64 {
        let total = later.total.saturating_sub(self.total);
        let idle = later.idle.saturating_sub(self.idle);
        if total == 0 {
            return 0.0;
        }
        (1.0 - idle as f64 / total as f64) * 100.0
    }
}

/// Aggregate `cpu` line of `/proc/stat`. Idle time includes iowait.
fn parse_cpu_times(stat: &str) -> Option<CpuTimes> {
    let line = stat.lines().find(|l| l.starts_with("cpu "))?;
    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    if fields.len() < 4 {
        return None;
    }
    // user nice system idle iowait irq softirq steal [guest guest_nice]
    // guest time is already counted in user/nice.
    let total: u64 = fields.iter().take(8).sum();
    let idle = fields[3] + fields.get(4).copied().unwrap_or(0);
    Some(CpuTimes { idle, total })
}

#[derive(Debug, PartialEq)]
struct MemInfo {
    total_kb: u64,
    available_kb: u64,
}

impl MemInfo {
    fn used_kb(&self) -> u64 {
        self.total_kb.saturating_sub(self.available_kb)
    }
}

fn parse_meminfo(text: &str) -> Option<MemInfo> {
    let field = |name: &str| {
        text.lines()
            .find_map(|l| l.strip_prefix(name)?.strip_prefix(':'))
            .and_then(|rest| rest.split_whitespace().next()?.parse::<u64>().ok())
    };
    Some(MemInfo {
        total_kb: field("MemTotal")?,
        available_kb: field("MemAvailable")?,
    })
}

#[derive(Debug, Default, PartialEq)]
struct DiskUsage {
    total_kb: u64,
    used_kb: u64,
    available_kb: u64,
}

/// Second line of POSIX `df -kP` output.
fn parse_df(output: &str) -> Option<DiskUsage> {
    let line = output.lines().nth(1)?;
    let mut cols = line.split_whitespace().skip(1);
    let mut next = || cols.next()?.parse::<u64>().ok();
    Some(DiskUsage {
        total_kb: next()?,
        used_kb: next()?,
        available_kb: next()?,
    })
}

fn parse_uptime(text: &str) -> Option<f64> {
    text.split_whitespace().next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CPUINFO: &str = "\
processor\t: 0
vendor_id\t: GenuineIntel
physical id\t: 0
core id\t\t: 0
cpu MHz\t\t: 2000.000
flags\t\t: fpu vme hypervisor sse

processor\t: 1
physical id\t: 0
core id\t\t: 0
cpu MHz\t\t: 3000.000
flags\t\t: fpu vme hypervisor sse

processor\t: 2
physical id\t: 0
core id\t\t: 1
cpu MHz\t\t: 2500.000
flags\t\t: fpu vme hypervisor sse
";

    #[test]
    fn cpuinfo_counts_cores_and_averages_clock() {
        let info = parse_cpuinfo(CPUINFO);
        assert_eq!(info.logical_cores, 3);
        assert_eq!(info.physical_cores, 2);
        assert_eq!(info.frequency_mhz, 2500.0);
        assert!(info.hypervisor);
    }

    #[test]
    fn cpuinfo_without_topology_falls_back_to_logical() {
        let text = "processor\t: 0\nBogoMIPS\t: 108.00\n\nprocessor\t: 1\nBogoMIPS\t: 108.00\n";
        let info = parse_cpuinfo(text);
        assert_eq!(info.logical_cores, 2);
        assert_eq!(info.physical_cores, 2);
        assert_eq!(info.frequency_mhz, 0.0);
        assert!(!info.hypervisor);
    }

    #[test]
    fn cpu_times_include_iowait_as_idle() {
        let stat = "cpu  100 0 50 800 50 0 0 0 0 0\ncpu0 100 0 50 800 50 0 0 0 0 0\nintr 1\n";
        let times = parse_cpu_times(stat).unwrap();
        assert_eq!(times.total, 1000);
        assert_eq!(times.idle, 850);
    }

    #[test]
    fn cpu_usage_between_samples() {
        let before = CpuTimes { idle: 800, total: 1000 };
        let after = CpuTimes { idle: 1100, total: 1400 };
        assert_eq!(before.usage_until(&after), 25.0);
        assert_eq!(before.usage_until(&before), 0.0);
    }

    #[test]
    fn stat_without_cpu_line() {
        assert!(parse_cpu_times("intr 1 2 3\n").is_none());
        assert!(parse_cpu_times("cpu  1 2\n").is_none());
    }

    #[test]
    fn meminfo_fields() {
        let text = "MemTotal:       16000000 kB\nMemFree:         1000000 kB\nMemAvailable:    4000000 kB\n";
        let mem = parse_meminfo(text).unwrap();
        assert_eq!(mem.total_kb, 16_000_000);
        assert_eq!(mem.available_kb, 4_000_000);
        assert_eq!(mem.used_kb(), 12_000_000);
    }

    #[test]
    fn meminfo_requires_available() {
        assert!(parse_meminfo("MemTotal: 100 kB\nMemFree: 50 kB\n").is_none());
    }

    #[test]
    fn df_posix_output() {
        let out = "Filesystem     1024-blocks     Used Available Capacity Mounted on\n\
                   /dev/sda1        102400000 40960000  61440000      40% /\n";
        let disk = parse_df(out).unwrap();
        assert_eq!(disk.total_kb, 102_400_000);
        assert_eq!(disk.used_kb, 40_960_000);
        assert_eq!(disk.available_kb, 61_440_000);
        assert!(parse_df("Filesystem\n").is_none());
    }

    #[test]
    fn uptime_seconds() {
        assert_eq!(parse_uptime("7200.55 14000.10\n"), Some(7200.55));
        assert_eq!(parse_uptime(""), None);
    }

    #[test]
    fn vm_markers_in_kernel_release() {
        assert!(looks_virtual("5.15.0-1034-KVM"));
        assert!(looks_virtual("6.1.0-microsoft-standard-WSL2 hyper-v"));
        assert!(!looks_virtual("6.8.0-45-generic"));
    }

    #[test]
    fn os_family_names() {
        assert_eq!(os_family("linux"), "Linux");
        assert_eq!(os_family("macos"), "Darwin");
        assert_eq!(os_family("freebsd"), "Freebsd");
    }

    #[test]
    fn unit_conversions() {
        assert_eq!(kib_to_gib(1024 * 1024), 1.0);
        assert_eq!(kib_to_gib(1536 * 1024), 1.5);
        assert_eq!(percent(1, 0), 0.0);
        assert_eq!(round1(33.333), 33.3);
    }

    fn fake_proc() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("sys/kernel")).unwrap();
        std::fs::write(root.join("cpuinfo"), CPUINFO).unwrap();
        std::fs::write(root.join("stat"), "cpu  100 0 100 800 0 0 0 0 0 0\n").unwrap();
        std::fs::write(
            root.join("meminfo"),
            "MemTotal:        8388608 kB\nMemAvailable:    2097152 kB\n",
        )
        .unwrap();
        std::fs::write(root.join("uptime"), "36000.00 1000.00\n").unwrap();
        std::fs::write(root.join("sys/kernel/hostname"), "edge-07\n").unwrap();
        std::fs::write(root.join("sys/kernel/osrelease"), "6.8.0-45-generic\n").unwrap();
        std::fs::write(root.join("sys/kernel/version"), "#45-Ubuntu SMP\n").unwrap();
        dir
    }

    #[tokio::test]
    async fn sample_from_fake_proc() {
        let dir = fake_proc();
        let host = ProcfsHost::new("/")
            .with_proc_root(dir.path())
            .with_cpu_interval(Duration::ZERO);

        let report = host.sample().await.unwrap();
        assert_eq!(report.hostname, "edge-07");
        assert_eq!(report.os_version, "#45-Ubuntu SMP");
        assert_eq!(report.cpu_logical_cores, 3);
        assert_eq!(report.cpu_physical_cores, 2);
        assert_eq!(report.cpu_frequency_mhz, 2500.0);
        // Both stat reads are identical.
        assert_eq!(report.cpu_usage_percent, 0.0);
        assert_eq!(report.memory_total_gb, 8.0);
        assert_eq!(report.memory_used_gb, 6.0);
        assert_eq!(report.memory_free_gb, 2.0);
        assert_eq!(report.memory_usage_percent, 75.0);
        assert_eq!(report.system_uptime_hours, 10.0);
        // hypervisor flag in the fake cpuinfo
        assert!(report.running_in_vm);
    }

    #[tokio::test]
    async fn missing_meminfo_fails_sample() {
        let dir = fake_proc();
        std::fs::remove_file(dir.path().join("meminfo")).unwrap();
        let host = ProcfsHost::new("/")
            .with_proc_root(dir.path())
            .with_cpu_interval(Duration::ZERO);

        let err = host.sample().await.unwrap_err();
        assert!(matches!(err, ToolError::Sampling(ref m) if m.contains("meminfo")));
    }
}
