//! Axum router configuration for the upload service

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use super::AppState;
use super::handlers::{self, CONVERT_ENDPOINT};

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.upload.body_limit();

    Router::new()
        .route(
            CONVERT_ENDPOINT,
            post(handlers::convert_upload).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/limits", get(handlers::limits))
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
