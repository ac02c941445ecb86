use axum::{Router, routing::get};

use crate::{AppState, handlers};

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // Probes
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        // Crawl endpoint
        .route("/crawl", get(handlers::crawl))
        .with_state(state)
}
