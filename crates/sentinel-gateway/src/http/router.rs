//! HTTP router setup

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::http::handlers::{self, AppState};

/// Create the HTTP router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/telemetry",
            get(handlers::list_telemetry).post(handlers::submit_telemetry),
        )
        .route("/weatherforecast", get(handlers::weather_forecast))
        .route("/grpc", get(handlers::grpc_info))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
