use host_monitor::{
    error::SystemError,
    metrics::{data::*, HistoryBuffer, MetricsStore},
    MetricsReport, MonitorConfig, WebConfig,
};
use std::sync::Arc;

fn sample(cpu: f64) -> Sample {
    Sample::new(cpu, 50.0, 40.0, 1_000, 2_000)
}

/// Test Sample serialization and deserialization
#[test]
fn test_sample_serialization() {
    let sample = Sample::new(25.5, 60.0, 70.25, 1_000_000, 2_000_000);

    let json = serde_json::to_string_pretty(&sample).expect("Should serialize to JSON");
    assert!(json.contains("25.5"));
    assert!(json.contains("70.25"));

    let deserialized: Sample = serde_json::from_str(&json).expect("Should deserialize from JSON");
    assert_eq!(deserialized, sample);
}

/// Test the FIFO eviction scenario from a capacity-three buffer
#[test]
fn test_history_eviction_scenario() {
    let buffer = HistoryBuffer::new(3);
    for cpu in [10.0, 20.0, 30.0, 40.0] {
        buffer.append(sample(cpu));
    }

    let cpu: Vec<f64> = buffer.snapshot().into_iter().map(|s| s.cpu_percent).collect();
    assert_eq!(cpu, vec![20.0, 30.0, 40.0]);
    assert_eq!(buffer.latest().map(|s| s.cpu_percent), Some(40.0));
}

/// Test that history keeps chronological order
#[test]
fn test_history_is_chronological() {
    let start = chrono::Utc::now();
    let buffer = HistoryBuffer::new(50);
    for i in 0..120 {
        buffer.append(sample(i as f64).with_timestamp(start + chrono::Duration::seconds(i)));
    }

    let snapshot = buffer.snapshot();
    assert_eq!(snapshot.len(), 50);
    assert!(snapshot
        .windows(2)
        .all(|pair| pair[0].timestamp < pair[1].timestamp && pair[0].cpu_percent < pair[1].cpu_percent));
    assert_eq!(snapshot[0].cpu_percent, 70.0);
}

/// Test SystemError creation and formatting
#[test]
fn test_system_error_types() {
    let provider_error = SystemError::provider_error("CPU unreadable");
    assert!(format!("{}", provider_error).contains("CPU unreadable"));

    let parse_error = SystemError::parse_error("Failed to parse data");
    assert!(format!("{}", parse_error).contains("Failed to parse data"));

    let web_error = SystemError::web_server_error("Server startup failed");
    assert!(format!("{}", web_error).contains("Server startup failed"));

    let config_error = SystemError::config_error("Invalid configuration");
    assert!(format!("{}", config_error).contains("Invalid configuration"));
}

/// Test WebConfig builder pattern
#[test]
fn test_web_config() {
    let config = WebConfig::new("127.0.0.1", 9090).with_cors(false);

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 9090);
    assert!(!config.enable_cors);
    assert_eq!(config.bind_address(), "127.0.0.1:9090");
    assert_eq!(WebConfig::default().bind_address(), "0.0.0.0:5000");
}

/// Test MonitorConfig serialization
#[test]
fn test_monitor_config_roundtrip() {
    let config = MonitorConfig::default().with_history_len(120);
    let json = serde_json::to_string(&config).expect("Should serialize");
    let parsed: MonitorConfig = serde_json::from_str(&json).expect("Should deserialize");
    assert_eq!(parsed, config);
}

/// Test JSON schema of the metrics report
#[test]
fn test_json_schema_validation() {
    let store = MetricsStore::new(5);
    store.record(sample(10.0));
    store.record(sample(20.0));

    let history = store.history().series();
    let latest = history.latest().expect("history is populated");
    let report = MetricsReport::new(latest, history, 12, None, 3);

    let json_value = serde_json::to_value(&report).expect("Should serialize");

    assert!(json_value.get("latest").is_some());
    assert!(json_value.get("history").is_some());

    let latest = &json_value["latest"];
    assert_eq!(latest["cpu_percent"], 20.0);
    assert_eq!(latest["uptime_seconds"], 12);
    assert_eq!(latest["process_count"], 3);
    assert_eq!(latest["loadavg"], serde_json::json!([]));

    let history = &json_value["history"];
    let lengths: Vec<usize> = ["timestamps", "cpu", "mem", "disk", "net_sent", "net_recv"]
        .iter()
        .map(|key| history[*key].as_array().expect("array").len())
        .collect();
    assert!(lengths.iter().all(|&len| len == 2));
}

/// Concurrent readers never see misaligned series while a writer appends
#[test]
fn test_concurrent_reads_see_aligned_series() {
    let buffer = Arc::new(HistoryBuffer::new(64));

    let writer = {
        let buffer = Arc::clone(&buffer);
        std::thread::spawn(move || {
            for i in 0..5_000 {
                buffer.append(sample(i as f64));
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let buffer = Arc::clone(&buffer);
            std::thread::spawn(move || {
                for _ in 0..1_000 {
                    let series = buffer.series();
                    assert!(series.is_aligned());
                    assert!(series.len() <= 64);
                    if let Some(latest) = series.latest() {
                        assert_eq!(Some(&latest.cpu_percent), series.cpu.last());
                    }
                }
            })
        })
        .collect();

    writer.join().expect("writer thread");
    for reader in readers {
        reader.join().expect("reader thread");
    }
    assert_eq!(buffer.len(), 64);
}
