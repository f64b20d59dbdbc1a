//! Data structures for host metrics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One point-in-time reading of every tracked signal.
///
/// Samples are immutable once created; the history buffer only ever drops
/// them as a side effect of overflowing its capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// When the reading was taken (UTC, serialized as ISO-8601 with a `Z` suffix)
    pub timestamp: DateTime<Utc>,
    /// CPU usage percentage (not clamped, may briefly exceed 100)
    pub cpu_percent: f64,
    /// Memory usage percentage
    pub mem_percent: f64,
    /// Usage percentage of the root filesystem
    pub disk_percent: f64,
    /// Cumulative bytes sent over all interfaces
    pub net_sent: u64,
    /// Cumulative bytes received over all interfaces
    pub net_recv: u64,
}

impl Sample {
    /// Create a sample stamped with the current time.
    pub fn new(
        cpu_percent: f64,
        mem_percent: f64,
        disk_percent: f64,
        net_sent: u64,
        net_recv: u64,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            cpu_percent,
            mem_percent,
            disk_percent,
            net_sent,
            net_recv,
        }
    }

    /// Replace the timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// System load averages.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadAverage {
    pub one_minute: f64,
    pub five_minutes: f64,
    pub fifteen_minutes: f64,
}

impl LoadAverage {
    /// The three averages as a `[1m, 5m, 15m]` list.
    pub fn to_vec(self) -> Vec<f64> {
        vec![self.one_minute, self.five_minutes, self.fifteen_minutes]
    }
}

/// Static identifiers of the host, shown on the dashboard page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlatformInfo {
    /// System hostname
    pub hostname: String,
    /// Operating system name
    pub os_name: String,
    /// Operating system version
    pub os_version: String,
    /// Kernel release
    pub kernel_version: String,
    /// CPU architecture (e.g., "x86_64")
    pub architecture: String,
    /// Version of this exporter
    pub exporter_version: String,
}

/// The history buffer laid out as six index-aligned sequences.
///
/// Element `i` of every sequence describes the same [`Sample`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistorySeries {
    pub timestamps: Vec<DateTime<Utc>>,
    pub cpu: Vec<f64>,
    pub mem: Vec<f64>,
    pub disk: Vec<f64>,
    pub net_sent: Vec<u64>,
    pub net_recv: Vec<u64>,
}

impl HistorySeries {
    /// Number of samples held.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Whether all six sequences have the same length.
    pub fn is_aligned(&self) -> bool {
        let len = self.timestamps.len();
        self.cpu.len() == len
            && self.mem.len() == len
            && self.disk.len() == len
            && self.net_sent.len() == len
            && self.net_recv.len() == len
    }

    /// Reassemble the sample stored at `index`.
    pub fn get(&self, index: usize) -> Option<Sample> {
        Some(Sample {
            timestamp: *self.timestamps.get(index)?,
            cpu_percent: *self.cpu.get(index)?,
            mem_percent: *self.mem.get(index)?,
            disk_percent: *self.disk.get(index)?,
            net_sent: *self.net_sent.get(index)?,
            net_recv: *self.net_recv.get(index)?,
        })
    }

    /// The most recent sample, if any.
    pub fn latest(&self) -> Option<Sample> {
        self.len().checked_sub(1).and_then(|last| self.get(last))
    }

    /// All samples in chronological order.
    pub fn samples(&self) -> Vec<Sample> {
        (0..self.len()).filter_map(|i| self.get(i)).collect()
    }
}
