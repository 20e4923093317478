//! Authentication error types.

use thiserror::Error;

use crate::db::StorageError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No account matches the email and password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
