//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use warehub_core::config::AppConfig;
use warehub_database::Stores;
use warehub_service::AlertDispatcher;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Data stores
    pub stores: Stores,
    /// Alert dispatcher
    pub dispatcher: Arc<AlertDispatcher>,
}

impl AppState {
    /// Creates the state from its parts.
    pub fn new(config: AppConfig, stores: Stores, dispatcher: Arc<AlertDispatcher>) -> Self {
        Self {
            config: Arc::new(config),
            stores,
            dispatcher,
        }
    }
}
