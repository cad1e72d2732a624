//! Custom error types for the API service

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// No user with this id
    #[error("Could not find user '{0}'.")]
    UserNotFound(i32),

    /// Authenticated caller has no user record
    #[error("Could not find user '{0}'.")]
    UnknownPrincipal(String),

    /// The store did not produce an id for a new user
    #[error("Unable to create user.")]
    UserCreationFailed,

    /// Unauthorized access
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Password hashing or hash parsing failed
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl From<argon2::password_hash::Error> for ApiError {
    fn from(e: argon2::password_hash::Error) -> Self {
        ApiError::PasswordHash(e.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UserNotFound(_) | ApiError::UnknownPrincipal(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Database(DatabaseError::UniqueViolation(_)) => StatusCode::CONFLICT,
            ApiError::UserCreationFailed
            | ApiError::InternalServerError
            | ApiError::PasswordHash(_)
            | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error_message = match &self {
            ApiError::UserCreationFailed => {
                return (status, self.to_string()).into_response();
            }
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Database(DatabaseError::UniqueViolation(_)) => {
                "Resource already exists".to_string()
            }
            ApiError::Database(e) => {
                error!("Database failure: {}", e);
                "Database error".to_string()
            }
            ApiError::PasswordHash(e) => {
                error!("Password hashing failure: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
