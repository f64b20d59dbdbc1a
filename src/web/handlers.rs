//! HTTP handlers for the dashboard and the two exporters.

use crate::config::MonitorConfig;
use crate::export::{collect_prometheus, collect_report, prometheus, MetricsReport};
use crate::metrics::{MetricsProvider, MetricsStore, PlatformInfo, SharedProvider};
use crate::web::page;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::error;

/// State shared by every request handler.
pub struct AppState<P> {
    pub store: Arc<MetricsStore>,
    pub provider: SharedProvider<P>,
    pub config: MonitorConfig,
    pub platform: PlatformInfo,
}

impl<P> AppState<P> {
    pub fn new(
        store: Arc<MetricsStore>,
        provider: SharedProvider<P>,
        config: MonitorConfig,
        platform: PlatformInfo,
    ) -> Self {
        Self {
            store,
            provider,
            config,
            platform,
        }
    }
}

pub type SharedState<P> = Arc<AppState<P>>;

/// Serve the dashboard page.
pub async fn index<P: MetricsProvider>(State(state): State<SharedState<P>>) -> Html<String> {
    Html(page::render_dashboard(
        &state.config,
        &state.platform,
        state.store.start_time(),
    ))
}

/// Latest values and full history as JSON.
pub async fn metrics<P: MetricsProvider>(
    State(state): State<SharedState<P>>,
) -> Result<Json<MetricsReport>, StatusCode> {
    match collect_report(&state.store, &state.provider).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            error!("Failed to build metrics report: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Latest values in Prometheus exposition format.
pub async fn metrics_prometheus<P: MetricsProvider>(
    State(state): State<SharedState<P>>,
) -> Response {
    if !state.config.prometheus_enabled {
        return StatusCode::NOT_FOUND.into_response();
    }

    match collect_prometheus(&state.store, &state.provider).await {
        Ok(snapshot) => (
            [(header::CONTENT_TYPE, prometheus::CONTENT_TYPE)],
            snapshot.render(),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to collect Prometheus metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
