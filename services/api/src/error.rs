//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{
    error::{FieldErrors, RepositoryError},
    response::Envelope,
};
use thiserror::Error;
use tracing::error;

use crate::storage::StorageError;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, invalid or revoked bearer token
    #[error("Unauthorized")]
    Unauthorized,

    /// Authenticated but not an admin
    #[error("Forbidden")]
    Forbidden,

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Field-keyed validation failures
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Logged, never sent to the client
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Repository failure with a not-found message naming the entity
    pub fn entity(e: RepositoryError, entity: &str) -> Self {
        match e {
            RepositoryError::NotFound => ApiError::NotFound(format!("{} not found", entity)),
            other => other.into(),
        }
    }
}

fn conflict_message(constraint: &str) -> String {
    match constraint {
        "users_email_key" => "Email is already registered".to_string(),
        "transactions_order_number_key" => "Order number already exists".to_string(),
        "product_sizes_pkey" => "Size is listed more than once".to_string(),
        c if c.ends_with("_fkey") => "Resource is still referenced by other records".to_string(),
        _ => "Resource already exists".to_string(),
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => ApiError::NotFound("Resource not found".into()),
            RepositoryError::Conflict(constraint) => {
                ApiError::Conflict(conflict_message(&constraint))
            }
            RepositoryError::InvalidReference(constraint) => {
                ApiError::BadRequest(format!("Referenced record does not exist ({})", constraint))
            }
            RepositoryError::Validation(fields) => ApiError::Validation(fields),
            RepositoryError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, data) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string(), None),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Admin access required".to_string(),
                None,
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                serde_json::to_value(fields).ok(),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::Internal(detail) => {
                error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        (status, Json(Envelope::error(message, data))).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
