//! Route definitions for the Warehub HTTP API.
//!
//! The dispatch endpoint lives at the root; auxiliary endpoints are
//! mounted under `/api`.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(template_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .merge(alert_routes())
        .nest("/api", api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Alert dispatch endpoint and its preflight
fn alert_routes() -> Router<AppState> {
    Router::new().route(
        "/send-alerts",
        post(handlers::alerts::send_alerts).options(handlers::alerts::preflight),
    )
}

/// Health endpoint
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Template authoring endpoints
fn template_routes() -> Router<AppState> {
    Router::new().route(
        "/templates/validate",
        post(handlers::templates::validate_template),
    )
}
