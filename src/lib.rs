pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use routes::{create_router, AppState};

/// The router with request-id, tracing and CORS layers applied
pub fn build_app(state: Arc<AppState>) -> Router {
    create_router(state).layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(
                middleware::request_id_middleware,
            ))
            .layer(TraceLayer::new_for_http().make_span_with(middleware::make_span_with_request_id))
            .layer(CorsLayer::permissive()),
    )
}
