//! Convenience result type alias for TermChat.

use crate::error::AppError;

/// A specialized `Result` type for TermChat operations.
pub type AppResult<T> = Result<T, AppError>;
