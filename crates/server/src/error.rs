//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; the response body is always a small JSON object
//! with a stable `message`, and internal detail never reaches the caller.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::policy::Deny;
use crate::services::auth::AuthError;

/// Application-level error type for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed required input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A partial update carried no whitelisted fields.
    #[error("Empty update")]
    EmptyUpdate,

    /// No identity attached: token missing, malformed, or expired.
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Password verification failed.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The identity's role is not in the capability's required set.
    #[error("Forbidden")]
    Forbidden,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Another identity already uses this email.
    #[error("Email already in use")]
    DuplicateEmail,

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON body for every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // The only unique constraint in the schema is the user email index
            RepositoryError::Conflict(_) => Self::DuplicateEmail,
            RepositoryError::NotFound => Self::NotFound("record".to_owned()),
            RepositoryError::EmptyUpdate => Self::EmptyUpdate,
            other => Self::Database(other),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidEmail(e) => Self::Validation(e.to_string()),
            AuthError::WeakPassword(msg) => Self::Validation(msg),
            AuthError::UserNotFound => Self::NotFound("user".to_owned()),
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::EmailTaken => Self::DuplicateEmail,
            AuthError::PasswordHash => Self::Internal("password hashing failed".to_owned()),
            AuthError::TokenMint(msg) => Self::Internal(msg),
            AuthError::Repository(e) => e.into(),
        }
    }
}

impl From<Deny> for AppError {
    fn from(deny: Deny) -> Self {
        match deny {
            Deny::Unauthenticated => Self::Unauthenticated,
            Deny::Forbidden => Self::Forbidden,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Validation(_) | Self::EmptyUpdate => StatusCode::BAD_REQUEST,
            Self::Unauthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::DuplicateEmail => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Validation(msg) => msg.clone(),
            Self::EmptyUpdate => "No fields to update.".to_owned(),
            Self::Unauthenticated => "Invalid or expired token.".to_owned(),
            Self::InvalidCredentials => "Invalid credentials.".to_owned(),
            Self::Forbidden => "Insufficient role.".to_owned(),
            Self::NotFound(what) => format!("{what} not found."),
            Self::DuplicateEmail => "Email already in use.".to_owned(),
            Self::Database(_) | Self::Internal(_) => "Internal server error.".to_owned(),
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("donation".to_string());
        assert_eq!(err.to_string(), "Not found: donation");

        let err = AppError::Validation("title is required".to_string());
        assert_eq!(err.to_string(), "Validation error: title is required");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::Validation("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(AppError::EmptyUpdate), StatusCode::BAD_REQUEST);
        assert_eq!(
            get_status(AppError::Unauthenticated),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(get_status(AppError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            get_status(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(get_status(AppError::DuplicateEmail), StatusCode::CONFLICT);
        assert_eq!(
            get_status(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_conflict_maps_to_duplicate_email() {
        let err: AppError = RepositoryError::Conflict("email already in use".to_owned()).into();
        assert_eq!(get_status(err), StatusCode::CONFLICT);
    }

    #[test]
    fn test_deny_maps_to_http_statuses() {
        assert_eq!(
            get_status(Deny::Unauthenticated.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(get_status(Deny::Forbidden.into()), StatusCode::FORBIDDEN);
    }
}
