//! Host metrics collection backed by sysinfo and direct /proc access.

use crate::error::{Result, SystemError};
use crate::metrics::{
    data::{LoadAverage, PlatformInfo, Sample},
    traits::MetricsProvider,
};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use sysinfo::{Disks, Networks, ProcessRefreshKind, RefreshKind, System, ThreadKind};

/// Mount point whose usage is reported as the disk signal.
const ROOT_MOUNT: &str = "/";

/// Metrics provider reading the local host.
pub struct SystemCollector {
    system: System,
    disks: Disks,
    networks: Networks,
    /// Process table, refreshed off the async workers.
    process_table: Arc<Mutex<System>>,
}

impl SystemCollector {
    /// Create a new system collector instance.
    pub fn new() -> Result<Self> {
        let mut system = System::new();
        // CPU usage is computed between two refreshes, so take the baseline now.
        system.refresh_cpu_usage();
        system.refresh_memory();
        let disks = Disks::new_with_refreshed_list();
        let networks = Networks::new_with_refreshed_list();

        Ok(Self {
            system,
            disks,
            networks,
            process_table: Arc::new(Mutex::new(System::new())),
        })
    }

    /// Refresh the signals that make up a sample.
    fn refresh(&mut self) {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();
        self.disks.refresh();
        self.networks.refresh();
    }

    /// Mean usage across all cores since the previous refresh.
    fn read_cpu_percent(&self) -> Result<f64> {
        let cpus = self.system.cpus();

        if cpus.is_empty() {
            return Err(SystemError::provider_error("No CPU information available"));
        }

        let total: f32 = cpus.iter().map(|cpu| cpu.cpu_usage()).sum();
        Ok(f64::from(total / cpus.len() as f32))
    }

    fn read_mem_percent(&self) -> Result<f64> {
        let total_bytes = self.system.total_memory();
        if total_bytes == 0 {
            return Err(SystemError::provider_error("Total memory reported as zero"));
        }

        let available_bytes = self.system.available_memory();
        let used_bytes = total_bytes.saturating_sub(available_bytes);
        Ok(used_bytes as f64 / total_bytes as f64 * 100.0)
    }

    fn read_disk_percent(&self) -> Result<f64> {
        let root = self
            .disks
            .iter()
            .find(|disk| disk.mount_point() == Path::new(ROOT_MOUNT))
            .ok_or_else(|| {
                SystemError::provider_error(format!("No filesystem mounted at {}", ROOT_MOUNT))
            })?;

        let total_bytes = root.total_space();
        if total_bytes == 0 {
            return Ok(0.0);
        }

        let used_bytes = total_bytes.saturating_sub(root.available_space());
        Ok(used_bytes as f64 / total_bytes as f64 * 100.0)
    }

    /// Cumulative (sent, received) byte totals over every interface.
    fn read_network_totals(&self) -> (u64, u64) {
        self.networks
            .iter()
            .fold((0u64, 0u64), |(sent, recv), (_, network)| {
                (
                    sent.saturating_add(network.total_transmitted()),
                    recv.saturating_add(network.total_received()),
                )
            })
    }

    /// Read system load averages from /proc/loadavg.
    fn read_proc_loadavg() -> Option<LoadAverage> {
        let loadavg = fs::read_to_string("/proc/loadavg").ok()?;
        parse_loadavg(&loadavg)
    }
}

/// Refresh the process table and count its processes.
///
/// On Linux sysinfo lists userland threads next to their processes; only
/// entries backed by a PID directory in /proc are counted.
fn count_processes(system: &mut System) -> u64 {
    system.refresh_specifics(RefreshKind::new().with_processes(ProcessRefreshKind::new()));
    system
        .processes()
        .values()
        .filter(|process| !matches!(process.thread_kind(), Some(ThreadKind::Userland)))
        .count() as u64
}

/// Parse the first three fields of a /proc/loadavg line.
pub(crate) fn parse_loadavg(contents: &str) -> Option<LoadAverage> {
    let mut parts = contents.split_whitespace();

    let one_minute = parts.next()?.parse().ok()?;
    let five_minutes = parts.next()?.parse().ok()?;
    let fifteen_minutes = parts.next()?.parse().ok()?;

    Some(LoadAverage {
        one_minute,
        five_minutes,
        fifteen_minutes,
    })
}

impl MetricsProvider for SystemCollector {
    async fn collect_sample(&mut self) -> Result<Sample> {
        self.refresh();

        let cpu_percent = self.read_cpu_percent()?;
        let mem_percent = self.read_mem_percent()?;
        let disk_percent = self.read_disk_percent()?;
        let (net_sent, net_recv) = self.read_network_totals();

        Ok(Sample::new(
            cpu_percent,
            mem_percent,
            disk_percent,
            net_sent,
            net_recv,
        ))
    }

    async fn process_count(&mut self) -> Result<u64> {
        let process_table = Arc::clone(&self.process_table);
        tokio::task::spawn_blocking(move || {
            let mut system = process_table.lock().unwrap_or_else(PoisonError::into_inner);
            count_processes(&mut system)
        })
        .await
        .map_err(|e| SystemError::provider_error(format!("Process count task failed: {}", e)))
    }

    fn load_average(&self) -> Option<LoadAverage> {
        if let Some(load) = Self::read_proc_loadavg() {
            return Some(load);
        }

        if cfg!(windows) {
            // sysinfo reports zeros on Windows rather than failing.
            return None;
        }

        let load = System::load_average();
        Some(LoadAverage {
            one_minute: load.one,
            five_minutes: load.five,
            fifteen_minutes: load.fifteen,
        })
    }

    fn platform_info(&self) -> PlatformInfo {
        PlatformInfo {
            hostname: System::host_name().unwrap_or_else(|| "unknown".to_string()),
            os_name: System::name().unwrap_or_else(|| "unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "unknown".to_string()),
            kernel_version: System::kernel_version().unwrap_or_else(|| "unknown".to_string()),
            architecture: std::env::consts::ARCH.to_string(),
            exporter_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
