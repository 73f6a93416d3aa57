//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Client errors become a JSON
//! body with a `message` (or an `errors` list for field validation); server
//! errors are captured to Sentry and logged, and the client only ever sees
//! `{"message":"Server error"}`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// One failed field check on a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub msg: String,
    pub path: &'static str,
    pub location: &'static str,
}

impl FieldError {
    #[must_use]
    pub fn body(path: &'static str, msg: impl Into<String>) -> Self {
        Self {
            kind: "field",
            msg: msg.into(),
            path,
            location: "body",
        }
    }
}

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// One or more body fields failed validation.
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is authenticated but not allowed to do this.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body exceeded the configured limit.
    #[error("Payload too large")]
    PayloadTooLarge,
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials
                | AuthError::InvalidToken
                | AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
                AuthError::AdminAlreadyExists => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash | AuthError::TokenSigning(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Client-facing message. Never carries internal detail.
    fn message(&self) -> String {
        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials!".to_owned(),
                AuthError::AdminAlreadyExists => "Email already exists!".to_owned(),
                AuthError::InvalidToken => "Invalid or missing token".to_owned(),
                AuthError::TokenExpired => "Token expired".to_owned(),
                _ => "Server error".to_owned(),
            },
            Self::NotFound(msg) | Self::Forbidden(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::PayloadTooLarge => "Request body too large".to_owned(),
            Self::Validation(_) => "Validation failed".to_owned(),
            Self::Database(_) => "Server error".to_owned(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        match self {
            Self::Validation(errors) => (status, Json(json!({ "errors": errors }))).into_response(),
            other => (status, Json(json!({ "message": other.message() }))).into_response(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge
        } else {
            Self::BadRequest(rejection.body_text())
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Recipe not found".to_string());
        assert_eq!(err.to_string(), "Not found: Recipe not found");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidToken)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::AdminAlreadyExists)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::TokenExpired)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::PasswordHash)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_server_error_hides_detail() {
        let (status, body) = body_json(AppError::Database(RepositoryError::DataCorruption(
            "column password_hash is null".to_owned(),
        )))
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "Server error" }));
    }

    #[tokio::test]
    async fn test_validation_body_shape() {
        let (status, body) = body_json(AppError::Validation(vec![FieldError::body(
            "username",
            "Username is required",
        )]))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "errors": [{
                    "type": "field",
                    "msg": "Username is required",
                    "path": "username",
                    "location": "body"
                }]
            })
        );
    }
}
