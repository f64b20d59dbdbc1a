//! Traits for host metrics collection.

use crate::error::Result;
use crate::metrics::data::{LoadAverage, PlatformInfo, Sample};

/// Source of point-in-time host readings.
///
/// Primary signals (CPU, memory, disk, network) are fallible and a failure
/// aborts whatever operation asked for them. Secondary signals such as the
/// load average degrade to `None` instead.
pub trait MetricsProvider: Send + 'static {
    /// Take one full reading of the primary signals.
    fn collect_sample(&mut self) -> impl std::future::Future<Output = Result<Sample>> + Send;

    /// Count the processes currently running on the host.
    fn process_count(&mut self) -> impl std::future::Future<Output = Result<u64>> + Send;

    /// Read the 1, 5 and 15 minute load averages, if the platform has them.
    fn load_average(&self) -> Option<LoadAverage>;

    /// Static identifiers of the host.
    fn platform_info(&self) -> PlatformInfo;
}
