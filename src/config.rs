//! Sampling, retention and alerting configuration.
//!
//! All values are fixed at startup; nothing here is reloaded at runtime.

use crate::error::{Result, SystemError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the sampler, the history buffer and the exporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between two samples
    pub sample_interval: f64,
    /// Number of samples retained in the history buffer
    pub history_len: usize,
    /// CPU usage percentage above which the dashboard flags an alert
    pub alert_cpu_percent: f64,
    /// Memory usage percentage above which the dashboard flags an alert
    pub alert_mem_percent: f64,
    /// Whether `/metrics_prometheus` is served
    pub prometheus_enabled: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sample_interval: crate::DEFAULT_SAMPLE_INTERVAL_SECS,
            history_len: crate::DEFAULT_HISTORY_LEN,
            alert_cpu_percent: crate::DEFAULT_ALERT_CPU_PERCENT,
            alert_mem_percent: crate::DEFAULT_ALERT_MEM_PERCENT,
            prometheus_enabled: true,
        }
    }
}

impl MonitorConfig {
    /// Set the sample interval in seconds.
    pub fn with_sample_interval(mut self, seconds: f64) -> Self {
        self.sample_interval = seconds;
        self
    }

    /// Set the history buffer capacity.
    pub fn with_history_len(mut self, len: usize) -> Self {
        self.history_len = len;
        self
    }

    /// Set the CPU and memory alert thresholds.
    pub fn with_alert_thresholds(mut self, cpu_percent: f64, mem_percent: f64) -> Self {
        self.alert_cpu_percent = cpu_percent;
        self.alert_mem_percent = mem_percent;
        self
    }

    /// Enable or disable the Prometheus endpoint.
    pub fn with_prometheus(mut self, enabled: bool) -> Self {
        self.prometheus_enabled = enabled;
        self
    }

    /// The sample interval as a [`Duration`].
    ///
    /// Only meaningful once [`validate`](Self::validate) has accepted the config.
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.sample_interval)
    }

    /// Check that the configuration can drive a sampler.
    pub fn validate(&self) -> Result<()> {
        if !self.sample_interval.is_finite() || self.sample_interval <= 0.0 {
            return Err(SystemError::config_error(format!(
                "sample interval must be a positive number of seconds, got {}",
                self.sample_interval
            )));
        }
        if self.history_len == 0 {
            return Err(SystemError::config_error(
                "history length must be at least 1",
            ));
        }
        Ok(())
    }
}
