//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] persimmon_core::EmailError),

    /// Invalid username.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] persimmon_core::UsernameError),

    /// Password too weak.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Email or username already registered.
    #[error("email or username already exists")]
    UserAlreadyExists,

    /// Wrong password or no such user. The message is deliberately identical
    /// for both cases.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Account is suspended; distinct from `InvalidCredentials` so the UI can
    /// point the user at an administrator.
    #[error("this account has been suspended, contact an administrator")]
    AccountSuspended,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
