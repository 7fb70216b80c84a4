//! Application builder: wires router, middleware, and state into an Axum app.

use std::sync::Arc;

use axum::Router;

use warehub_core::config::AppConfig;
use warehub_database::Stores;
use warehub_service::AlertDispatcher;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(config: AppConfig, stores: Stores, dispatcher: Arc<AlertDispatcher>) -> Router {
    build_router(AppState::new(config, stores, dispatcher))
}
