//! Credential store outcomes.

use termchat_core::error::AppError;
use thiserror::Error;

/// Why a registration was refused.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// The identity is already registered.
    #[error("Username exists")]
    AlreadyExists,
    /// The mapping could not be written; the insert was rolled back.
    #[error("failed to persist credentials: {0}")]
    Persistence(#[source] AppError),
}

/// Why a login was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoginError {
    /// Unknown identity or wrong secret. The two are indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl From<RegisterError> for AppError {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::AlreadyExists => AppError::conflict("Username exists"),
            RegisterError::Persistence(source) => source,
        }
    }
}

impl From<LoginError> for AppError {
    fn from(err: LoginError) -> Self {
        AppError::authentication(err.to_string())
    }
}
