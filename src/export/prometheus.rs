//! Prometheus plaintext exposition of the latest reading.

use crate::error::Result;
use crate::metrics::{sampler::SharedProvider, store::MetricsStore, traits::MetricsProvider};
use std::fmt::Write;

/// Content type of the exposition endpoint.
pub const CONTENT_TYPE: &str = "text/plain; charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetricKind {
    Gauge,
    Counter,
}

impl MetricKind {
    fn as_str(self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

/// Values exported at `/metrics_prometheus`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrometheusSnapshot {
    pub cpu_percent: f64,
    pub mem_percent: f64,
    pub disk_percent: f64,
    pub process_count: u64,
    pub uptime_seconds: u64,
}

impl PrometheusSnapshot {
    /// Render the five metric blocks.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(512);
        push_metric(
            &mut out,
            "system_cpu_percent",
            "CPU usage percent",
            MetricKind::Gauge,
            &format_float(self.cpu_percent),
        );
        push_metric(
            &mut out,
            "system_mem_percent",
            "Memory usage percent",
            MetricKind::Gauge,
            &format_float(self.mem_percent),
        );
        push_metric(
            &mut out,
            "system_disk_percent",
            "Disk usage percent",
            MetricKind::Gauge,
            &format_float(self.disk_percent),
        );
        push_metric(
            &mut out,
            "system_process_count",
            "Number of processes",
            MetricKind::Gauge,
            &self.process_count.to_string(),
        );
        push_metric(
            &mut out,
            "system_uptime_seconds",
            "Uptime in seconds since exporter start",
            MetricKind::Counter,
            &self.uptime_seconds.to_string(),
        );
        out
    }
}

fn push_metric(out: &mut String, name: &str, help: &str, kind: MetricKind, value: &str) {
    // Writing to a String cannot fail.
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} {}", name, kind.as_str());
    let _ = writeln!(out, "{} {}", name, value);
}

/// Format a sample value, keeping a decimal point on whole numbers.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Gather the exported values, reading the provider when history is empty.
pub async fn collect_prometheus<P: MetricsProvider>(
    store: &MetricsStore,
    provider: &SharedProvider<P>,
) -> Result<PrometheusSnapshot> {
    let latest = store.history().latest();
    let uptime_seconds = store.uptime_seconds();

    let mut provider = provider.lock().await;
    let latest = match latest {
        Some(sample) => sample,
        None => provider.collect_sample().await?,
    };
    let process_count = provider.process_count().await?;

    Ok(PrometheusSnapshot {
        cpu_percent: latest.cpu_percent,
        mem_percent: latest.mem_percent,
        disk_percent: latest.disk_percent,
        process_count,
        uptime_seconds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{data::Sample, fake::FakeProvider};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[test]
    fn test_render_exact_output() {
        let snapshot = PrometheusSnapshot {
            cpu_percent: 55.5,
            mem_percent: 62.1,
            disk_percent: 40.0,
            process_count: 120,
            uptime_seconds: 3661,
        };

        let expected = "\
# HELP system_cpu_percent CPU usage percent
# TYPE system_cpu_percent gauge
system_cpu_percent 55.5
# HELP system_mem_percent Memory usage percent
# TYPE system_mem_percent gauge
system_mem_percent 62.1
# HELP system_disk_percent Disk usage percent
# TYPE system_disk_percent gauge
system_disk_percent 40.0
# HELP system_process_count Number of processes
# TYPE system_process_count gauge
system_process_count 120
# HELP system_uptime_seconds Uptime in seconds since exporter start
# TYPE system_uptime_seconds counter
system_uptime_seconds 3661
";
        assert_eq!(snapshot.render(), expected);
    }

    #[test]
    fn test_every_block_has_matching_help_and_type() {
        let rendered = PrometheusSnapshot {
            cpu_percent: 1.0,
            mem_percent: 2.0,
            disk_percent: 3.0,
            process_count: 4,
            uptime_seconds: 5,
        }
        .render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 15);

        for block in lines.chunks(3) {
            let name = block[2].split(' ').next().unwrap();
            assert_eq!(block[0].split(' ').nth(2), Some(name));
            assert_eq!(block[1].split(' ').nth(2), Some(name));
            let kind = block[1].split(' ').nth(3).unwrap();
            let expected = if name == "system_uptime_seconds" { "counter" } else { "gauge" };
            assert_eq!(kind, expected);
        }
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(40.0), "40.0");
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(62.1), "62.1");
        assert_eq!(format_float(100.25), "100.25");
        assert_eq!(format_float(f64::NAN), "NaN");
        assert_eq!(format_float(f64::INFINITY), "+Inf");
    }

    #[tokio::test]
    async fn test_collect_uses_latest_sample() {
        let store = MetricsStore::new(4);
        store.record(Sample::new(10.0, 20.0, 30.0, 1, 2));
        store.record(Sample::new(11.0, 21.0, 31.0, 3, 4));
        let provider = Arc::new(Mutex::new(FakeProvider::default().with_process_count(99)));

        let snapshot = collect_prometheus(&store, &provider).await.unwrap();
        assert_eq!(snapshot.cpu_percent, 11.0);
        assert_eq!(snapshot.mem_percent, 21.0);
        assert_eq!(snapshot.disk_percent, 31.0);
        assert_eq!(snapshot.process_count, 99);
        assert_eq!(provider.lock().await.calls(), 0);
    }

    #[tokio::test]
    async fn test_collect_falls_back_when_empty() {
        let store = MetricsStore::new(4);
        let provider = Arc::new(Mutex::new(FakeProvider::with_cpu_values(&[33.0])));

        let snapshot = collect_prometheus(&store, &provider).await.unwrap();
        assert_eq!(snapshot.cpu_percent, 33.0);
        assert_eq!(provider.lock().await.calls(), 1);
    }
}
