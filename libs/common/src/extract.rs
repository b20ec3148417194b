//! Extractors whose rejections use the response envelope
//!
//! axum's stock `Json`, `Path` and `Query` reject with plain-text bodies; these
//! wrappers turn the rejection into a 400 envelope so clients always get
//! JSON back.

use axum::{
    Json, async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request, rejection::JsonRejection},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use crate::response::Envelope;

/// Rejection for malformed request input
#[derive(Debug)]
pub struct BadInput(pub String);

impl IntoResponse for BadInput {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(Envelope::error(self.0, None)),
        )
            .into_response()
    }
}

/// JSON body extractor
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BadInput;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| BadInput(e.body_text()))?;
        Ok(JsonBody(value))
    }
}

/// Path parameter extractor
pub struct PathParam<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = BadInput;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| BadInput(e.body_text()))?;
        Ok(PathParam(value))
    }
}

/// Query string extractor
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = BadInput;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| BadInput(e.body_text()))?;
        Ok(QueryParams(value))
    }
}
