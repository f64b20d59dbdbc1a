//! Dashboard HTML page.
//!
//! The page is static apart from a handful of values substituted at render
//! time; live data is fetched by the browser from `/metrics`.

use crate::config::MonitorConfig;
use crate::metrics::PlatformInfo;
use chrono::{DateTime, SecondsFormat, Utc};

/// Render the dashboard with configuration and platform details embedded.
pub fn render_dashboard(
    config: &MonitorConfig,
    platform: &PlatformInfo,
    start_time: DateTime<Utc>,
) -> String {
    let interval_ms = (config.sample_interval * 1000.0).round().max(1.0) as u64;

    DASHBOARD_TEMPLATE
        .replace("{{sample_interval}}", &config.sample_interval.to_string())
        .replace("{{interval_ms}}", &interval_ms.to_string())
        .replace("{{alert_cpu}}", &config.alert_cpu_percent.to_string())
        .replace("{{alert_mem}}", &config.alert_mem_percent.to_string())
        .replace("{{history_len}}", &config.history_len.to_string())
        .replace("{{hostname}}", &escape_html(&platform.hostname))
        .replace("{{os_name}}", &escape_html(&platform.os_name))
        .replace("{{os_version}}", &escape_html(&platform.os_version))
        .replace("{{kernel_version}}", &escape_html(&platform.kernel_version))
        .replace("{{architecture}}", &escape_html(&platform.architecture))
        .replace("{{exporter_version}}", &escape_html(&platform.exporter_version))
        .replace(
            "{{start_time}}",
            &start_time.to_rfc3339_opts(SecondsFormat::Secs, true),
        )
        .replace(
            "{{prometheus_link}}",
            if config.prometheus_enabled {
                r#"<a href="/metrics_prometheus">Prometheus metrics</a>"#
            } else {
                ""
            },
        )
}

/// Escape text for use inside HTML element content and attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const DASHBOARD_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Host Monitor - {{hostname}}</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Ubuntu, sans-serif;
            background: #f4f6fb;
            color: #333;
            padding: 20px;
        }

        .container { max-width: 1200px; margin: 0 auto; }

        .header { margin-bottom: 24px; }
        .header h1 { font-size: 2rem; color: #3b4a6b; }
        .header p { color: #666; margin-top: 4px; }

        .dashboard {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(260px, 1fr));
            gap: 16px;
            margin-bottom: 24px;
        }

        .card {
            background: white;
            border-radius: 10px;
            padding: 18px;
            box-shadow: 0 4px 14px rgba(0,0,0,0.08);
        }

        .card h3 { color: #667eea; margin-bottom: 10px; }
        .card.alert { box-shadow: 0 0 0 3px #ff6b6b; }

        .value { font-size: 2rem; font-weight: bold; }
        .sub { color: #888; font-size: 0.9rem; }

        svg.spark { width: 100%; height: 50px; margin-top: 8px; }
        svg.spark polyline { fill: none; stroke: #667eea; stroke-width: 1.5; }

        table { width: 100%; border-collapse: collapse; }
        td { padding: 4px 0; border-bottom: 1px solid #eee; }
        td:first-child { color: #666; font-weight: 600; }

        .status { color: #888; font-size: 0.9rem; }
        .status.error { color: #ff6b6b; }
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>{{hostname}}</h1>
            <p>Sampling every {{sample_interval}}s, keeping the last {{history_len}} samples. {{prometheus_link}}</p>
        </div>

        <div class="dashboard">
            <div class="card" id="cpu-card">
                <h3>CPU</h3>
                <div class="value" id="cpu">-</div>
                <div class="sub">alert above {{alert_cpu}}%</div>
                <svg class="spark" viewBox="0 0 100 100" preserveAspectRatio="none"><polyline id="cpu-spark"/></svg>
            </div>
            <div class="card" id="mem-card">
                <h3>Memory</h3>
                <div class="value" id="mem">-</div>
                <div class="sub">alert above {{alert_mem}}%</div>
                <svg class="spark" viewBox="0 0 100 100" preserveAspectRatio="none"><polyline id="mem-spark"/></svg>
            </div>
            <div class="card">
                <h3>Disk</h3>
                <div class="value" id="disk">-</div>
                <svg class="spark" viewBox="0 0 100 100" preserveAspectRatio="none"><polyline id="disk-spark"/></svg>
            </div>
            <div class="card">
                <h3>Network</h3>
                <div class="sub">sent <span id="net-sent">-</span></div>
                <div class="sub">received <span id="net-recv">-</span></div>
                <div class="sub">rate <span id="net-rate">-</span></div>
            </div>
            <div class="card">
                <h3>System</h3>
                <table>
                    <tr><td>OS</td><td>{{os_name}} {{os_version}}</td></tr>
                    <tr><td>Kernel</td><td>{{kernel_version}}</td></tr>
                    <tr><td>Architecture</td><td>{{architecture}}</td></tr>
                    <tr><td>Exporter</td><td>{{exporter_version}}</td></tr>
                    <tr><td>Started</td><td>{{start_time}}</td></tr>
                    <tr><td>Uptime</td><td id="uptime">-</td></tr>
                    <tr><td>Processes</td><td id="procs">-</td></tr>
                    <tr><td>Load</td><td id="load">-</td></tr>
                </table>
            </div>
        </div>

        <div class="status" id="status">Waiting for data...</div>
    </div>

    <script>
        const INTERVAL_MS = {{interval_ms}};
        const ALERT_CPU = {{alert_cpu}};
        const ALERT_MEM = {{alert_mem}};

        function formatBytes(bytes) {
            const sizes = ['B', 'KB', 'MB', 'GB', 'TB'];
            if (bytes === 0) return '0 B';
            const i = Math.min(Math.floor(Math.log(bytes) / Math.log(1024)), sizes.length - 1);
            return `${(bytes / Math.pow(1024, i)).toFixed(1)} ${sizes[i]}`;
        }

        function formatUptime(seconds) {
            const days = Math.floor(seconds / 86400);
            const hours = Math.floor((seconds % 86400) / 3600);
            const minutes = Math.floor((seconds % 3600) / 60);
            if (days > 0) return `${days}d ${hours}h ${minutes}m`;
            if (hours > 0) return `${hours}h ${minutes}m`;
            return `${minutes}m ${seconds % 60}s`;
        }

        function spark(id, values) {
            if (values.length === 0) return;
            const step = values.length > 1 ? 100 / (values.length - 1) : 0;
            const points = values.map((v, i) =>
                `${(i * step).toFixed(2)},${(100 - Math.min(Math.max(v, 0), 100)).toFixed(2)}`);
            document.getElementById(id).setAttribute('points', points.join(' '));
        }

        function netRate(history) {
            const n = history.timestamps.length;
            if (n < 2) return '-';
            const dt = (Date.parse(history.timestamps[n - 1]) - Date.parse(history.timestamps[n - 2])) / 1000;
            if (dt <= 0) return '-';
            const up = (history.net_sent[n - 1] - history.net_sent[n - 2]) / dt;
            const down = (history.net_recv[n - 1] - history.net_recv[n - 2]) / dt;
            return `${formatBytes(Math.max(up, 0))}/s up, ${formatBytes(Math.max(down, 0))}/s down`;
        }

        function update(data) {
            const latest = data.latest;
            const history = data.history;

            document.getElementById('cpu').textContent = `${latest.cpu_percent.toFixed(1)}%`;
            document.getElementById('mem').textContent = `${latest.mem_percent.toFixed(1)}%`;
            document.getElementById('disk').textContent = `${latest.disk_percent.toFixed(1)}%`;
            document.getElementById('net-sent').textContent = formatBytes(latest.net_sent);
            document.getElementById('net-recv').textContent = formatBytes(latest.net_recv);
            document.getElementById('net-rate').textContent = netRate(history);
            document.getElementById('uptime').textContent = formatUptime(latest.uptime_seconds);
            document.getElementById('procs').textContent = latest.process_count;
            document.getElementById('load').textContent =
                latest.loadavg.length ? latest.loadavg.map(v => v.toFixed(2)).join(', ') : 'n/a';

            document.getElementById('cpu-card').classList.toggle('alert', latest.cpu_percent > ALERT_CPU);
            document.getElementById('mem-card').classList.toggle('alert', latest.mem_percent > ALERT_MEM);

            spark('cpu-spark', history.cpu);
            spark('mem-spark', history.mem);
            spark('disk-spark', history.disk);

            const status = document.getElementById('status');
            status.textContent = `Last sample ${latest.timestamp} (${history.timestamps.length} in history)`;
            status.className = 'status';
        }

        function poll() {
            fetch('/metrics')
                .then(response => {
                    if (!response.ok) throw new Error(`HTTP ${response.status}`);
                    return response.json();
                })
                .then(update)
                .catch(error => {
                    const status = document.getElementById('status');
                    status.textContent = `Failed to fetch metrics: ${error}`;
                    status.className = 'status error';
                })
                .finally(() => setTimeout(poll, INTERVAL_MS));
        }

        poll();
    </script>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embeds_configuration() {
        let config = MonitorConfig::default().with_alert_thresholds(85.0, 75.0);
        let platform = PlatformInfo {
            hostname: "box".to_string(),
            ..Default::default()
        };

        let html = render_dashboard(&config, &platform, Utc::now());
        assert!(html.contains("const INTERVAL_MS = 1000;"));
        assert!(html.contains("const ALERT_CPU = 85;"));
        assert!(html.contains("const ALERT_MEM = 75;"));
        assert!(html.contains("<h1>box</h1>"));
        assert!(html.contains("/metrics_prometheus"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_prometheus_link_hidden_when_disabled() {
        let config = MonitorConfig::default().with_prometheus(false);
        let html = render_dashboard(&config, &PlatformInfo::default(), Utc::now());
        assert!(!html.contains("/metrics_prometheus"));
    }

    #[test]
    fn test_platform_values_are_escaped() {
        let platform = PlatformInfo {
            hostname: "<script>alert('x')</script>".to_string(),
            ..Default::default()
        };
        let html = render_dashboard(&MonitorConfig::default(), &platform, Utc::now());
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }
}
