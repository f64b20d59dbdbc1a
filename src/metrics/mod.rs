//! Host metrics collection, retention and sampling.
//!
//! This module provides the readings themselves (CPU, memory, disk and
//! network counters), the bounded history they are kept in, and the
//! background sampler that feeds it.

pub mod collector;
pub mod data;
pub mod fake;
pub mod history;
pub mod sampler;
pub mod store;
pub mod traits;

// Re-export commonly used items
pub use collector::SystemCollector;
pub use data::{HistorySeries, LoadAverage, PlatformInfo, Sample};
pub use history::HistoryBuffer;
pub use sampler::{Sampler, SamplerHandle, SharedProvider};
pub use store::MetricsStore;
pub use traits::MetricsProvider;
