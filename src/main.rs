//! Host Monitor binary.
//!
//! Samples the local host and serves the dashboard, JSON feed and Prometheus
//! exporter.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use host_monitor::{
    export::{collect_prometheus, collect_report},
    metrics::SharedProvider,
    start_web_server, MetricsProvider, MetricsStore, MonitorConfig, SystemCollector, SystemError,
    WebConfig, DEFAULT_ALERT_CPU_PERCENT, DEFAULT_ALERT_MEM_PERCENT, DEFAULT_HISTORY_LEN,
    DEFAULT_SAMPLE_INTERVAL_SECS, DEFAULT_WEB_HOST, DEFAULT_WEB_PORT,
};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "host_monitor")]
#[command(about = "Host metrics sampler with a JSON dashboard feed and Prometheus exporter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Web server bind address
    #[arg(long, default_value = DEFAULT_WEB_HOST)]
    host: String,

    /// Web server port
    #[arg(short, long, default_value_t = DEFAULT_WEB_PORT)]
    port: u16,

    /// Seconds between samples
    #[arg(short, long, default_value_t = DEFAULT_SAMPLE_INTERVAL_SECS)]
    interval: f64,

    /// Number of samples kept in history
    #[arg(long, default_value_t = DEFAULT_HISTORY_LEN)]
    history: usize,

    /// CPU alert threshold shown on the dashboard, in percent
    #[arg(long, default_value_t = DEFAULT_ALERT_CPU_PERCENT)]
    alert_cpu: f64,

    /// Memory alert threshold shown on the dashboard, in percent
    #[arg(long, default_value_t = DEFAULT_ALERT_MEM_PERCENT)]
    alert_mem: f64,

    /// Do not serve /metrics_prometheus
    #[arg(long)]
    no_prometheus: bool,

    /// Disable CORS headers
    #[arg(long)]
    no_cors: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server (default)
    Serve,

    /// Take a single reading, print it and exit
    Snapshot(SnapshotArgs),

    /// Show platform information
    Info,
}

#[derive(Args)]
struct SnapshotArgs {
    /// Output format: json, prometheus, or pretty
    #[arg(short, long, default_value = "pretty")]
    format: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Prometheus,
    Pretty,
}

impl FromStr for OutputFormat {
    type Err = SystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "prometheus" => Ok(OutputFormat::Prometheus),
            "pretty" => Ok(OutputFormat::Pretty),
            other => Err(SystemError::parse_error(format!(
                "Unsupported format: {}. Use 'json', 'prometheus' or 'pretty'",
                other
            ))),
        }
    }
}

impl Cli {
    fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig::default()
            .with_sample_interval(self.interval)
            .with_history_len(self.history)
            .with_alert_thresholds(self.alert_cpu, self.alert_mem)
            .with_prometheus(!self.no_prometheus)
    }

    fn web_config(&self) -> WebConfig {
        WebConfig::new(&self.host, self.port).with_cors(!self.no_cors)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    match &cli.command {
        Some(Commands::Serve) | None => serve_command(&cli).await?,
        Some(Commands::Snapshot(args)) => snapshot_command(args).await?,
        Some(Commands::Info) => info_command()?,
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    Ok(())
}

async fn serve_command(cli: &Cli) -> anyhow::Result<()> {
    info!("Starting host monitor...");

    let monitor_config = cli.monitor_config();
    monitor_config
        .validate()
        .context("invalid monitor configuration")?;
    let web_config = cli.web_config();

    let collector = SystemCollector::new()?;
    info!("System collector initialized");

    info!("Configuration:");
    info!("  - Bind address: {}", web_config.bind_address());
    info!("  - CORS enabled: {}", web_config.enable_cors);
    info!("  - Sample interval: {}s", monitor_config.sample_interval);
    info!("  - History length: {}", monitor_config.history_len);
    info!(
        "  - Alert thresholds: cpu {}%, mem {}%",
        monitor_config.alert_cpu_percent, monitor_config.alert_mem_percent
    );
    info!("  - Prometheus enabled: {}", monitor_config.prometheus_enabled);

    start_web_server(web_config, monitor_config, collector).await?;

    Ok(())
}

async fn snapshot_command(args: &SnapshotArgs) -> anyhow::Result<()> {
    let format: OutputFormat = args.format.parse()?;

    // CPU usage needs two refreshes some time apart to be meaningful.
    let collector = SystemCollector::new()?;
    tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;
    let provider: SharedProvider<SystemCollector> = Arc::new(Mutex::new(collector));
    let store = MetricsStore::new(1);

    match format {
        OutputFormat::Json => {
            let report = collect_report(&store, &provider).await?;
            println!("{}", serde_json::to_string_pretty(&report.latest)?);
        }
        OutputFormat::Prometheus => {
            let snapshot = collect_prometheus(&store, &provider).await?;
            print!("{}", snapshot.render());
        }
        OutputFormat::Pretty => {
            let report = collect_report(&store, &provider).await?;
            let latest = report.latest;
            println!("Host Snapshot ({})", latest.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
            println!("==========================================");
            println!("  CPU:       {:.1}%", latest.cpu_percent);
            println!("  Memory:    {:.1}%", latest.mem_percent);
            println!("  Disk (/):  {:.1}%", latest.disk_percent);
            println!(
                "  Network:   {:.1} MB sent, {:.1} MB received",
                latest.net_sent as f64 / 1024.0 / 1024.0,
                latest.net_recv as f64 / 1024.0 / 1024.0
            );
            println!("  Processes: {}", latest.process_count);
            if latest.loadavg.is_empty() {
                println!("  Load:      n/a");
            } else {
                let load: Vec<String> = latest.loadavg.iter().map(|v| format!("{:.2}", v)).collect();
                println!("  Load:      {}", load.join(", "));
            }
        }
    }

    Ok(())
}

fn info_command() -> anyhow::Result<()> {
    let collector = SystemCollector::new()?;
    let platform = collector.platform_info();

    println!("Host Monitor System Information");
    println!("===============================");
    println!("  Hostname:     {}", platform.hostname);
    println!("  OS:           {} {}", platform.os_name, platform.os_version);
    println!("  Kernel:       {}", platform.kernel_version);
    println!("  Architecture: {}", platform.architecture);
    println!("  Exporter:     {}", platform.exporter_version);

    Ok(())
}
