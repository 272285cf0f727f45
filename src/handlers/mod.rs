pub mod dashboard;
pub mod health;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/", get(dashboard::dashboard_page))
        .route("/api/dashboard", get(dashboard::get_dashboard))
        .route("/api/dashboard/refresh", post(dashboard::refresh))
        .route(
            "/api/dashboard/distribution",
            get(dashboard::get_distribution),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
