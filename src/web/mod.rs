//! Web server for the host monitor.
//!
//! Serves the dashboard page, the JSON metrics feed and the Prometheus
//! exporter, and owns the sampler task for the lifetime of the server.

pub mod config;
pub mod handlers;
pub mod page;
pub mod router;

// Re-export commonly used items
pub use config::WebConfig;
pub use handlers::{AppState, SharedState};
pub use router::create_app;

use crate::config::MonitorConfig;
use crate::error::{Result, SystemError};
use crate::metrics::{MetricsProvider, MetricsStore, Sampler};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Start sampling with `provider` and serve until Ctrl-C.
///
/// The sampler is spawned before the listener is bound so the first
/// sample is usually in place by the time a browser connects.
pub async fn start_web_server<P: MetricsProvider>(
    web_config: WebConfig,
    monitor_config: MonitorConfig,
    provider: P,
) -> Result<()> {
    monitor_config.validate()?;

    // Parse the bind address
    let addr = web_config
        .bind_address()
        .parse::<SocketAddr>()
        .map_err(|e| SystemError::config_error(format!("Invalid bind address: {}", e)))?;

    let store = Arc::new(MetricsStore::new(monitor_config.history_len));
    let platform = provider.platform_info();
    let provider = Arc::new(Mutex::new(provider));

    let sampler = Sampler::new(
        Arc::clone(&provider),
        Arc::clone(&store),
        monitor_config.interval(),
    )
    .spawn();

    let state = Arc::new(AppState::new(store, provider, monitor_config, platform));
    let app = create_app(state, &web_config);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SystemError::web_server_error(format!("Failed to bind to address: {}", e)))?;

    info!("Starting host monitor web server on http://{}", addr);
    info!("Dashboard available at http://{}/", addr);
    info!("JSON metrics: http://{}/metrics", addr);
    info!("Prometheus metrics: http://{}/metrics_prometheus", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    sampler.abort();
    info!("Sampler stopped, web server shut down");

    served.map_err(|e| SystemError::web_server_error(format!("Server error: {}", e)))
}

/// Resolves on Ctrl-C. If the handler cannot be installed the server runs
/// until the process is killed.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, shutting down"),
        Err(e) => {
            error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
