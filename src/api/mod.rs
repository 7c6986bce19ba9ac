//! HTTP surface for the exchange endpoints.

pub mod error;
pub mod handlers;

use crate::core::RateSource;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn RateSource>,
}

impl AppState {
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self { source }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/exchanges/difference/{code}/{number}/",
            get(handlers::difference_rates),
        )
        .route(
            "/api/exchanges/difference/{code}/{number}",
            get(handlers::difference_rates),
        )
        .route(
            "/api/exchanges/{code}/{segment}/",
            get(handlers::currency_rates),
        )
        .route(
            "/api/exchanges/{code}/{segment}",
            get(handlers::currency_rates),
        )
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
