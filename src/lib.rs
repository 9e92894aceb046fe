use axum::{Router, routing::get};
use std::error::Error;
use tower_http::trace::TraceLayer;

use crate::handler::AppState;
use crate::scores::ScoreGateway;
use crate::store::ScoreStore;

pub mod api;
pub mod assets;
pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod model;
pub mod scores;
pub mod store;

/// Builds the full HTTP surface around `gateway`.
pub fn app<S: ScoreStore>(gateway: ScoreGateway<S>) -> Router {
    Router::new()
        .route("/", get(handler::serve_index))
        .route("/static/*path", get(assets::serve_static))
        .merge(scores::routes::<S>())
        .fallback(handler::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(gateway))
}

pub fn unpack_error(err: &dyn Error) -> String {
    let mut parts = Vec::new();
    parts.push(err.to_string());
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    parts.join(": ")
}
