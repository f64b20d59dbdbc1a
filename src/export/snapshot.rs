//! JSON report of the latest reading plus the full history.

use crate::error::Result;
use crate::metrics::{
    data::{HistorySeries, LoadAverage, Sample},
    sampler::SharedProvider,
    store::MetricsStore,
    traits::MetricsProvider,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Most recent value of every tracked signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestMetrics {
    pub timestamp: DateTime<Utc>,
    pub cpu_percent: f64,
    pub mem_percent: f64,
    pub disk_percent: f64,
    pub net_sent: u64,
    pub net_recv: u64,
    /// Whole seconds since the exporter started
    pub uptime_seconds: u64,
    /// `[1m, 5m, 15m]`, or empty when the platform has no load average
    pub loadavg: Vec<f64>,
    pub process_count: u64,
}

/// The document served at `/metrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub latest: LatestMetrics,
    pub history: HistorySeries,
}

impl MetricsReport {
    /// Assemble a report from one history read and the latest sample.
    ///
    /// `latest` must be the last element of `history` whenever history is
    /// non-empty; [`collect_report`] guarantees this by deriving both from
    /// the same read.
    pub fn new(
        latest: Sample,
        history: HistorySeries,
        uptime_seconds: u64,
        load_average: Option<LoadAverage>,
        process_count: u64,
    ) -> Self {
        Self {
            latest: LatestMetrics {
                timestamp: latest.timestamp,
                cpu_percent: latest.cpu_percent,
                mem_percent: latest.mem_percent,
                disk_percent: latest.disk_percent,
                net_sent: latest.net_sent,
                net_recv: latest.net_recv,
                uptime_seconds,
                loadavg: load_average.map(|load| load.to_vec()).unwrap_or_default(),
                process_count,
            },
            history,
        }
    }
}

/// Build the `/metrics` report.
///
/// Reads the history once. When it is still empty, one reading is taken
/// from the provider instead; a failure there is returned to the caller.
pub async fn collect_report<P: MetricsProvider>(
    store: &MetricsStore,
    provider: &SharedProvider<P>,
) -> Result<MetricsReport> {
    let history = store.history().series();
    let uptime_seconds = store.uptime_seconds();

    let mut provider = provider.lock().await;
    let latest = match history.latest() {
        Some(sample) => sample,
        None => provider.collect_sample().await?,
    };
    let load_average = provider.load_average();
    let process_count = provider.process_count().await?;

    Ok(MetricsReport::new(
        latest,
        history,
        uptime_seconds,
        load_average,
        process_count,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fake::{FakeProvider, FakeReading};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn provider(fake: FakeProvider) -> SharedProvider<FakeProvider> {
        Arc::new(Mutex::new(fake))
    }

    #[tokio::test]
    async fn test_latest_is_last_history_element() {
        let store = MetricsStore::new(3);
        for cpu in [10.0, 20.0, 30.0, 40.0] {
            store.record(Sample::new(cpu, 1.0, 2.0, 3, 4));
        }
        let provider = provider(
            FakeProvider::with_cpu_values(&[99.0])
                .with_process_count(42)
                .with_load_average(Some(LoadAverage {
                    one_minute: 0.5,
                    five_minutes: 0.25,
                    fifteen_minutes: 0.125,
                })),
        );

        let report = collect_report(&store, &provider).await.unwrap();

        assert_eq!(report.history.cpu, vec![20.0, 30.0, 40.0]);
        assert_eq!(report.latest.cpu_percent, 40.0);
        assert_eq!(Some(report.latest.timestamp), report.history.timestamps.last().copied());
        assert_eq!(report.latest.process_count, 42);
        assert_eq!(report.latest.loadavg, vec![0.5, 0.25, 0.125]);
        // History was populated, so the provider was never asked for a sample.
        assert_eq!(provider.lock().await.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_history_falls_back_to_fresh_reading() {
        let store = MetricsStore::new(5);
        let provider = provider(FakeProvider::with_cpu_values(&[12.5]).with_process_count(7));

        let report = collect_report(&store, &provider).await.unwrap();

        assert_eq!(report.latest.cpu_percent, 12.5);
        assert_eq!(report.latest.process_count, 7);
        assert!(report.latest.loadavg.is_empty());
        assert!(report.history.is_empty());
        assert!(report.history.is_aligned());
        // The fallback reading is not recorded.
        assert!(store.history().is_empty());
    }

    #[tokio::test]
    async fn test_fallback_failure_is_returned() {
        let store = MetricsStore::new(5);
        let provider = provider(FakeProvider::new(vec![FakeReading::Failure(
            "no root mount".into(),
        )]));

        let err = collect_report(&store, &provider).await.unwrap_err();
        assert!(err.to_string().contains("no root mount"));
    }

    #[tokio::test]
    async fn test_repeated_reports_have_identical_history() {
        let store = MetricsStore::new(5);
        store.record(Sample::new(1.0, 2.0, 3.0, 4, 5));
        store.record(Sample::new(6.0, 7.0, 8.0, 9, 10));
        let provider = provider(FakeProvider::default());

        let first = collect_report(&store, &provider).await.unwrap();
        let second = collect_report(&store, &provider).await.unwrap();

        assert_eq!(
            serde_json::to_string(&first.history).unwrap(),
            serde_json::to_string(&second.history).unwrap()
        );
    }

    #[test]
    fn test_json_layout() {
        let sample = Sample::new(55.5, 62.1, 40.0, 1000, 2000);
        let mut history = HistorySeries::default();
        history.timestamps.push(sample.timestamp);
        history.cpu.push(sample.cpu_percent);
        history.mem.push(sample.mem_percent);
        history.disk.push(sample.disk_percent);
        history.net_sent.push(sample.net_sent);
        history.net_recv.push(sample.net_recv);

        let report = MetricsReport::new(sample, history, 3661, None, 120);
        let json = serde_json::to_value(&report).unwrap();

        let latest = &json["latest"];
        for key in [
            "timestamp",
            "cpu_percent",
            "mem_percent",
            "disk_percent",
            "net_sent",
            "net_recv",
            "uptime_seconds",
            "loadavg",
            "process_count",
        ] {
            assert!(latest.get(key).is_some(), "latest.{} missing", key);
        }
        assert_eq!(latest["uptime_seconds"], 3661);
        assert!(latest["timestamp"].as_str().unwrap().ends_with('Z'));

        let history = &json["history"];
        for key in ["timestamps", "cpu", "mem", "disk", "net_sent", "net_recv"] {
            assert_eq!(history[key].as_array().map(Vec::len), Some(1), "history.{}", key);
        }
    }
}
