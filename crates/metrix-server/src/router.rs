//! Axum router wiring.
//!
//! Text-lane updates and queries, the JSON batch endpoint, the HTML/JSON
//! listings, and the operational endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{api, app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::page::index))
        .route("/metrics", get(api::list_json))
        .route("/update/:kind", post(api::update_missing_name))
        .route("/update/:kind/:name", post(api::update_missing_value))
        .route("/update/:kind/:name/:value", post(api::update))
        .route("/updates", post(api::update_batch))
        .route("/value/:kind/:name", get(api::value))
        .route("/healthz", get(ops::healthz))
        .route("/ops/metrics", get(ops::metrics))
        .fallback(api::not_found)
        .with_state(state)
}
