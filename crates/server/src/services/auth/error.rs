//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong password, unknown email, or malformed email. Deliberately one
    /// variant so callers cannot tell which.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An admin with this email is already registered.
    #[error("admin already exists")]
    AdminAlreadyExists,

    /// Bearer token is malformed or its signature does not verify.
    #[error("invalid session token")]
    InvalidToken,

    /// Bearer token verified but is past its expiry.
    #[error("session token expired")]
    TokenExpired,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token signing error.
    #[error("token signing error: {0}")]
    TokenSigning(String),
}
