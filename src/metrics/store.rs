//! Process-wide metrics state shared by the sampler and the HTTP layer.

use crate::metrics::{data::Sample, history::HistoryBuffer};
use chrono::{DateTime, Utc};

/// The history buffer plus the instant the exporter started.
///
/// Built once at startup and shared behind an `Arc` for the life of the
/// process.
#[derive(Debug)]
pub struct MetricsStore {
    history: HistoryBuffer,
    start_time: DateTime<Utc>,
}

impl MetricsStore {
    /// Create a store whose start time is now.
    pub fn new(history_len: usize) -> Self {
        Self::with_start_time(history_len, Utc::now())
    }

    pub fn with_start_time(history_len: usize, start_time: DateTime<Utc>) -> Self {
        Self {
            history: HistoryBuffer::new(history_len),
            start_time,
        }
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Append a freshly collected sample to the history.
    pub fn record(&self, sample: Sample) {
        self.history.append(sample);
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Whole seconds since the store was created.
    pub fn uptime_seconds(&self) -> u64 {
        (Utc::now() - self.start_time).num_seconds().max(0) as u64
    }
}
