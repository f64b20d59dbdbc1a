//! Exporters turning the history buffer into response bodies.
//!
//! - [`snapshot`]: JSON document with the latest values and full history
//! - [`prometheus`]: plaintext exposition of the latest values

pub mod prometheus;
pub mod snapshot;

pub use prometheus::{collect_prometheus, PrometheusSnapshot};
pub use snapshot::{collect_report, LatestMetrics, MetricsReport};
