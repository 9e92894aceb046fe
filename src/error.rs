use std::collections::BTreeMap;

use axum::{
    Json,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::api::DetailResponse;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(#[from] libsql::Error),
    #[error("malformed row: {0}")]
    Decode(String),
    #[error("insert did not return the stored row")]
    NoRowReturned,
}

/// Field name to error messages, serialized as `{"field": ["msg", ...]}`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, msg: impl Into<String>) {
        self.0.entry(field.to_owned()).or_default().push(msg.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("JSON parse error - {0}")]
    MalformedBody(String),
    #[error("storage error: {0}")]
    Storage(StoreError),
    #[error("not found")]
    NotFound,
    #[error("method {0} not allowed")]
    MethodNotAllowed(Method),
}

impl From<GatewayError> for ApiError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Validation(errors) => ApiError::Validation(errors),
            GatewayError::Storage(e) => ApiError::Storage(e),
        }
    }
}

pub const SCORES_ALLOW: &str = "GET, HEAD, POST";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            ApiError::MalformedBody(_) => {
                (StatusCode::BAD_REQUEST, Json(DetailResponse::new(&self.to_string()))).into_response()
            }
            ApiError::Storage(e) => {
                tracing::error!(error = %crate::unpack_error(&e), "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(DetailResponse::new("A server error occurred.")),
                )
                    .into_response()
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, Json(DetailResponse::new("Not found."))).into_response(),
            ApiError::MethodNotAllowed(method) => {
                let body = DetailResponse::new(&format!("Method \"{}\" not allowed.", method));
                let mut response = (StatusCode::METHOD_NOT_ALLOWED, Json(body)).into_response();
                response
                    .headers_mut()
                    .insert(header::ALLOW, HeaderValue::from_static(SCORES_ALLOW));
                response
            }
        }
    }
}
