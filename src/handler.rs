use std::sync::Arc;

use axum::response::{Html, IntoResponse, Response};

use crate::assets::Assets;
use crate::error::ApiError;
use crate::scores::ScoreGateway;

pub struct AppState<S> {
    pub gateway: Arc<ScoreGateway<S>>,
}

impl<S> AppState<S> {
    pub fn new(gateway: ScoreGateway<S>) -> Self {
        AppState {
            gateway: Arc::new(gateway),
        }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        AppState {
            gateway: self.gateway.clone(),
        }
    }
}

pub async fn serve_index() -> Response {
    match Assets::get("index.html") {
        Some(page) => Html(page.data.into_owned()).into_response(),
        None => {
            tracing::error!("game page missing from embedded assets");
            ApiError::NotFound.into_response()
        }
    }
}

pub async fn not_found() -> Response {
    ApiError::NotFound.into_response()
}
