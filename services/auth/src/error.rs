//! Error type for the authentication service

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use common::{
    error::{FieldErrors, RepositoryError},
    response::Envelope,
};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("validation failed")]
    Validation(FieldErrors),

    /// Unknown email and wrong password are deliberately indistinguishable
    #[error("incorrect email or password")]
    InvalidCredentials,

    #[error("unauthorized")]
    Unauthorized,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("too many login attempts")]
    TooManyAttempts { retry_after: u64 },

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AuthError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Conflict(_) => AuthError::Conflict("Email is already registered".into()),
            RepositoryError::Validation(fields) => AuthError::Validation(fields),
            other => AuthError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message, data) = match self {
            AuthError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                serde_json::to_value(fields).ok(),
            ),
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Incorrect email or password".to_string(),
                None,
            ),
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string(), None),
            AuthError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            AuthError::TooManyAttempts { retry_after } => {
                let mut response = (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(Envelope::error(
                        format!("Too many login attempts, try again in {} seconds", retry_after),
                        None,
                    )),
                )
                    .into_response();
                if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
                    response.headers_mut().insert(header::RETRY_AFTER, value);
                }
                return response;
            }
            AuthError::Internal(detail) => {
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
