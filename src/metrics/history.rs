//! Bounded in-memory history of recent samples.

use crate::metrics::data::{HistorySeries, Sample};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Six index-aligned ring buffers, one per sample field.
#[derive(Debug)]
struct Rings {
    timestamps: VecDeque<DateTime<Utc>>,
    cpu: VecDeque<f64>,
    mem: VecDeque<f64>,
    disk: VecDeque<f64>,
    net_sent: VecDeque<u64>,
    net_recv: VecDeque<u64>,
}

impl Rings {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            timestamps: VecDeque::with_capacity(capacity),
            cpu: VecDeque::with_capacity(capacity),
            mem: VecDeque::with_capacity(capacity),
            disk: VecDeque::with_capacity(capacity),
            net_sent: VecDeque::with_capacity(capacity),
            net_recv: VecDeque::with_capacity(capacity),
        }
    }

    fn len(&self) -> usize {
        self.timestamps.len()
    }

    fn pop_front(&mut self) {
        self.timestamps.pop_front();
        self.cpu.pop_front();
        self.mem.pop_front();
        self.disk.pop_front();
        self.net_sent.pop_front();
        self.net_recv.pop_front();
    }

    fn push_back(&mut self, sample: Sample) {
        self.timestamps.push_back(sample.timestamp);
        self.cpu.push_back(sample.cpu_percent);
        self.mem.push_back(sample.mem_percent);
        self.disk.push_back(sample.disk_percent);
        self.net_sent.push_back(sample.net_sent);
        self.net_recv.push_back(sample.net_recv);
    }

    fn get(&self, index: usize) -> Option<Sample> {
        Some(Sample {
            timestamp: *self.timestamps.get(index)?,
            cpu_percent: *self.cpu.get(index)?,
            mem_percent: *self.mem.get(index)?,
            disk_percent: *self.disk.get(index)?,
            net_sent: *self.net_sent.get(index)?,
            net_recv: *self.net_recv.get(index)?,
        })
    }

    fn to_series(&self) -> HistorySeries {
        HistorySeries {
            timestamps: self.timestamps.iter().copied().collect(),
            cpu: self.cpu.iter().copied().collect(),
            mem: self.mem.iter().copied().collect(),
            disk: self.disk.iter().copied().collect(),
            net_sent: self.net_sent.iter().copied().collect(),
            net_recv: self.net_recv.iter().copied().collect(),
        }
    }
}

/// Fixed-capacity FIFO store of the most recent samples.
///
/// A single lock guards all six series, so readers only ever see whole
/// samples. The lock is held for the copy or mutation alone.
#[derive(Debug)]
pub struct HistoryBuffer {
    capacity: usize,
    rings: Mutex<Rings>,
}

impl HistoryBuffer {
    /// Create an empty buffer. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            rings: Mutex::new(Rings::with_capacity(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Rings> {
        // Nothing panics while holding the guard, so a poisoned lock still
        // protects aligned data.
        self.rings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a sample, evicting the oldest one when full.
    pub fn append(&self, sample: Sample) {
        let mut rings = self.lock();
        if rings.len() == self.capacity {
            rings.pop_front();
        }
        rings.push_back(sample);
    }

    /// The most recently appended sample.
    pub fn latest(&self) -> Option<Sample> {
        let rings = self.lock();
        rings.len().checked_sub(1).and_then(|last| rings.get(last))
    }

    /// Copy of every retained sample, oldest first.
    pub fn snapshot(&self) -> Vec<Sample> {
        let rings = self.lock();
        (0..rings.len()).filter_map(|i| rings.get(i)).collect()
    }

    /// Copy of the six series taken in one read.
    pub fn series(&self) -> HistorySeries {
        self.lock().to_series()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
