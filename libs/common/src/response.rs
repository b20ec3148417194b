//! Uniform JSON envelope returned by every endpoint
//!
//! `{ "success": bool, "message": string, "data": T | null }`

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Response body shared by success and error responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    /// Success without a payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

impl Envelope<serde_json::Value> {
    /// Failure body; `data` carries field errors or stays null
    pub fn error(message: impl Into<String>, data: Option<serde_json::Value>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data,
        }
    }
}

/// An envelope paired with the status code it is sent with
pub struct Reply<T> {
    status: StatusCode,
    body: Envelope<T>,
}

impl<T: Serialize> Reply<T> {
    /// 200 with a payload
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            body: Envelope::ok(message, data),
        }
    }

    /// 201 with the created entity
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            body: Envelope::ok(message, data),
        }
    }
}

impl Reply<()> {
    /// 200 without a payload
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: Envelope::message(message),
        }
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
