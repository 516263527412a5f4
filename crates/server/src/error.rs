//! Unified error handling for the HTTP layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use paddock_core::UploadRejection;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::uploads::StorageError;

/// Application-level error type returned by handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Uploaded file was rejected by validation.
    #[error("{0}")]
    Upload(#[from] UploadRejection),

    /// Writing or removing an uploaded file failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Session store failure.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized")]
    Unauthorized,

    /// Login failed (unknown user or wrong password).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Request body or path failed validation.
    #[error("Bad request: {0}")]
    Validation(String),

    /// Request conflicts with existing data.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::UserAlreadyExists => Self::Conflict(err.to_string()),
            AuthError::InvalidUsername(_) | AuthError::WeakPassword(_) => {
                Self::Validation(err.to_string())
            }
            AuthError::Repository(e) => Self::Database(e),
            AuthError::PasswordHash => Self::Internal(err.to_string()),
        }
    }
}

impl AppError {
    /// Whether this error is the server's fault.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Database(e) => !matches!(
                e,
                RepositoryError::NotFound | RepositoryError::Conflict(_)
            ),
            Self::Storage(_) | Self::Session(_) | Self::Internal(_) => true,
            _ => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) | Self::Conflict(_) => {
                StatusCode::CONFLICT
            }
            Self::Database(_) | Self::Storage(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Upload(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match &self {
            _ if self.is_server_error() => "Internal server error".to_string(),
            Self::Unauthorized => return status.into_response(),
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::NotFound(msg) | Self::Forbidden(msg) | Self::Validation(msg) => msg.clone(),
            Self::Conflict(msg) => msg.clone(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Set the Sentry user context for the current request.
pub fn set_sentry_user(user_id: i32, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_owned()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
