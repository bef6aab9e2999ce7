use std::num::IntErrorKind;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::json::PrettyJson;
use models::errors::ModelError;
use serde::de::DeserializeOwned;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// Error response rendered as `{"error": <title>, "detail": <message|null>}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(detail.into()))
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "Forbidden", Some(detail.into()))
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({"error": self.title, "detail": self.detail});
        (self.status, PrettyJson(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            ServiceError::Validation(msg)
            | ServiceError::Model(ModelError::Validation(msg))
            | ServiceError::Model(ModelError::Conflict(msg)) => Self::bad_request(msg),
            other => {
                error!(err = %other, "request failed");
                Self::internal()
            }
        }
    }
}

/// `Json<T>` whose rejections (bad syntax, missing keys, wrong types) become 400 JSON errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(JsonApiError::new(
                StatusCode::BAD_REQUEST,
                "Malformed Request",
                Some(rejection.body_text()),
            )),
        }
    }
}

/// Numeric `:id` path segment.
///
/// Non-numeric ids are 400 JSON errors. Numbers outside the `i32` key range
/// cannot name a stored row, so they are reported as 404.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rej| JsonApiError::new(StatusCode::BAD_REQUEST, "Malformed Request", Some(rej.body_text())))?;
        parse_id(&raw).map(Self)
    }
}

fn parse_id(raw: &str) -> Result<i32, JsonApiError> {
    match raw.parse::<i32>() {
        Ok(id) => Ok(id),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Err(ServiceError::NotFound(format!("no record with id {raw}")).into())
        }
        Err(_) => Err(JsonApiError::new(
            StatusCode::BAD_REQUEST,
            "Malformed Request",
            Some(format!("invalid id `{raw}`: expected an integer")),
        )),
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
}
