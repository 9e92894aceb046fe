use axum::{Router, routing::get};

use super::handler;
use crate::handler::AppState;
use crate::store::ScoreStore;

pub fn routes<S: ScoreStore>() -> Router<AppState<S>> {
    Router::new().route(
        "/api/scores/",
        get(handler::list_scores::<S>)
            .post(handler::submit_score::<S>)
            .fallback(handler::method_not_allowed),
    )
}
