//! # warehub-api
//!
//! HTTP API layer for the Warehub alert pipeline built on Axum.
//!
//! Exposes the alert dispatch endpoint (with its CORS preflight), template
//! validation, and a health check, plus the middleware stack and error
//! mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
