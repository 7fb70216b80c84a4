//! HTTP request handlers.

pub mod alerts;
pub mod health;
pub mod templates;
