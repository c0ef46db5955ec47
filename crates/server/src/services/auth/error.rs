//! Authentication error types.

use thiserror::Error;

use amal_core::EmailError;

use crate::db::RepositoryError;

/// Errors from the authentication service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The supplied email address is malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The password does not meet requirements.
    #[error("{0}")]
    WeakPassword(String),

    /// No identity matches the supplied email.
    #[error("user not found")]
    UserNotFound,

    /// The password did not verify against the stored digest.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Another identity already uses this email.
    #[error("email already in use")]
    EmailTaken,

    /// Hashing or digest parsing failed. Carries no detail: digests and
    /// plaintexts must not reach logs or responses.
    #[error("password hashing failed")]
    PasswordHash,

    /// Token signing failed.
    #[error("token mint failed: {0}")]
    TokenMint(String),

    /// Underlying repository failure.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
