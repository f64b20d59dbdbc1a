//! Scripted metrics provider used by tests and benchmarks.

use crate::error::{Result, SystemError};
use crate::metrics::{
    data::{LoadAverage, PlatformInfo, Sample},
    traits::MetricsProvider,
};
use std::collections::VecDeque;

/// One scripted response to [`MetricsProvider::collect_sample`].
#[derive(Debug, Clone)]
pub enum FakeReading {
    Sample(Sample),
    Failure(String),
}

/// Provider that replays a script of readings.
///
/// Once the script is exhausted it keeps returning the last sample it
/// handed out, or a zeroed sample if it never had one.
#[derive(Debug, Default)]
pub struct FakeProvider {
    script: VecDeque<FakeReading>,
    last: Option<Sample>,
    process_count: u64,
    load_average: Option<LoadAverage>,
    platform: PlatformInfo,
    calls: usize,
}

impl FakeProvider {
    pub fn new(script: Vec<FakeReading>) -> Self {
        Self {
            script: script.into(),
            platform: PlatformInfo {
                hostname: "fake-host".to_string(),
                os_name: "FakeOS".to_string(),
                os_version: "1.0".to_string(),
                kernel_version: "1.0.0-fake".to_string(),
                architecture: std::env::consts::ARCH.to_string(),
                exporter_version: env!("CARGO_PKG_VERSION").to_string(),
            },
            ..Default::default()
        }
    }

    /// Script a sequence of successful readings with the given CPU values.
    pub fn with_cpu_values(values: &[f64]) -> Self {
        Self::new(
            values
                .iter()
                .enumerate()
                .map(|(i, &cpu)| {
                    FakeReading::Sample(Sample::new(cpu, 50.0, 40.0, i as u64 * 100, i as u64 * 200))
                })
                .collect(),
        )
    }

    pub fn with_process_count(mut self, count: u64) -> Self {
        self.process_count = count;
        self
    }

    pub fn with_load_average(mut self, load: Option<LoadAverage>) -> Self {
        self.load_average = load;
        self
    }

    pub fn with_platform(mut self, platform: PlatformInfo) -> Self {
        self.platform = platform;
        self
    }

    /// Append a reading to the end of the script.
    pub fn push(&mut self, reading: FakeReading) {
        self.script.push_back(reading);
    }

    /// How many times `collect_sample` has been called.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl MetricsProvider for FakeProvider {
    async fn collect_sample(&mut self) -> Result<Sample> {
        self.calls += 1;
        match self.script.pop_front() {
            Some(FakeReading::Sample(sample)) => {
                self.last = Some(sample.clone());
                Ok(sample)
            }
            Some(FakeReading::Failure(msg)) => Err(SystemError::provider_error(msg)),
            None => Ok(self
                .last
                .clone()
                .unwrap_or_else(|| Sample::new(0.0, 0.0, 0.0, 0, 0))),
        }
    }

    async fn process_count(&mut self) -> Result<u64> {
        Ok(self.process_count)
    }

    fn load_average(&self) -> Option<LoadAverage> {
        self.load_average
    }

    fn platform_info(&self) -> PlatformInfo {
        self.platform.clone()
    }
}
