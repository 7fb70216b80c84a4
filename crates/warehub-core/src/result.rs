//! Convenience result type alias for Warehub.

use crate::error::AppError;

/// A specialized `Result` type for Warehub operations.
pub type AppResult<T> = Result<T, AppError>;
