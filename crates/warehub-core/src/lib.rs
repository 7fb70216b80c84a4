//! # warehub-core
//!
//! Core crate for the Warehub alert pipeline. Contains configuration
//! schemas, the unified error system, and the traits implemented by the
//! outbound email providers.
//!
//! This crate has **no** internal dependencies on other Warehub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
