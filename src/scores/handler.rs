//! HTTP handlers for the scores resource

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};

use crate::error::{ApiError, GatewayError};
use crate::handler::AppState;
use crate::store::ScoreStore;

pub async fn list_scores<S: ScoreStore>(State(state): State<AppState<S>>) -> Response {
    match state.gateway.list_top_scores().await {
        Ok(scores) => {
            tracing::debug!(count = scores.len(), "listed top scores");
            (StatusCode::OK, Json(scores)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn submit_score<S: ScoreStore>(State(state): State<AppState<S>>, body: Bytes) -> Response {
    let payload = match parse_body(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::info!(error = %e, "rejected unparseable score submission");
            return e.into_response();
        }
    };

    match state.gateway.submit_score(&payload).await {
        Ok(score) => (StatusCode::CREATED, Json(score)).into_response(),
        Err(GatewayError::Validation(errors)) => {
            tracing::info!(%errors, "rejected score submission");
            ApiError::Validation(errors).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn method_not_allowed(method: Method) -> Response {
    ApiError::MethodNotAllowed(method).into_response()
}

/// An empty body is an empty submission. Content-Type is not enforced.
fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body).map_err(|e| ApiError::MalformedBody(e.to_string()))
}
