//! # Host Monitor - Host Metrics Sampler and Exporter
//!
//! A small single-process collector that samples local resource usage once
//! per interval, keeps a bounded history in memory and serves it over HTTP.
//!
//! ## Features
//!
//! - **Periodic sampling**: CPU, memory, root filesystem usage and network byte counters
//! - **Bounded history**: fixed-size FIFO, oldest samples evicted first
//! - **JSON feed**: latest values plus the full history for a dashboard
//! - **Prometheus exporter**: plaintext exposition of the latest values
//! - **Library + Binary**: Use as a crate or standalone application
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use host_monitor::{start_web_server, MonitorConfig, SystemCollector, WebConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let collector = SystemCollector::new()?;
//!
//!     // Sample every second, serve on 0.0.0.0:5000
//!     start_web_server(WebConfig::default(), MonitorConfig::default(), collector).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod metrics;
pub mod web;

// Re-export public API
pub use config::MonitorConfig;
pub use error::{Result, SystemError};
pub use export::{MetricsReport, PrometheusSnapshot};
pub use metrics::{
    collector::SystemCollector,
    data::{HistorySeries, LoadAverage, PlatformInfo, Sample},
    history::HistoryBuffer,
    sampler::{Sampler, SamplerHandle},
    store::MetricsStore,
    traits::MetricsProvider,
};

pub use web::{start_web_server, WebConfig};

/// The default number of seconds between samples
pub const DEFAULT_SAMPLE_INTERVAL_SECS: f64 = 1.0;

/// The default number of samples kept in history
pub const DEFAULT_HISTORY_LEN: usize = 300;

/// The default CPU alert threshold, in percent
pub const DEFAULT_ALERT_CPU_PERCENT: f64 = 80.0;

/// The default memory alert threshold, in percent
pub const DEFAULT_ALERT_MEM_PERCENT: f64 = 80.0;

/// The default web server bind host
pub const DEFAULT_WEB_HOST: &str = "0.0.0.0";

/// The default web server port
pub const DEFAULT_WEB_PORT: u16 = 5000;
