//! Web application router and middleware setup.

use crate::metrics::MetricsProvider;
use crate::web::config::WebConfig;
use crate::web::handlers::{self, SharedState};
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the axum application with all routes and middleware.
pub fn create_app<P: MetricsProvider>(state: SharedState<P>, config: &WebConfig) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::index::<P>))
        .route("/metrics", get(handlers::metrics::<P>))
        .route("/metrics_prometheus", get(handlers::metrics_prometheus::<P>))
        .with_state(state);

    // Add CORS if enabled
    if config.enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonitorConfig;
    use crate::metrics::{fake::FakeProvider, MetricsStore};
    use crate::web::handlers::AppState;
    use axum::{body::Body, http::Request, http::StatusCode};
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_create_app_serves_index() {
        let provider = FakeProvider::default();
        let platform = provider.platform_info();
        let state = Arc::new(AppState::new(
            Arc::new(MetricsStore::new(10)),
            Arc::new(Mutex::new(provider)),
            MonitorConfig::default(),
            platform,
        ));

        let app = create_app(state, &WebConfig::default());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
