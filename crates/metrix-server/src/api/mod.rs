//! HTTP handlers for the metric update/query protocol.
//!
//! Handlers only translate between HTTP and the dispatcher; every rule about
//! what is a valid update lives in `dispatch` and `metrix_core`.

pub mod error;
pub mod page;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use metrix_core::error::MetrixError;
use metrix_core::protocol::json::decode_batch;
use metrix_core::protocol::text::{updated_message, TEXT_PLAIN};
use metrix_core::MetricKind;

use crate::app_state::AppState;

pub use error::ApiError;

/// `POST /update/{kind}/{name}/{value}`
pub async fn update(
    State(app): State<AppState>,
    Path((kind, name, value)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    let u = app
        .dispatcher()
        .update(&kind, &name, &value)
        .map_err(ApiError::update)?;

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, TEXT_PLAIN)], updated_message(&u.name)).into_response())
}

/// `POST /update/{kind}/{name}` with no value segment.
pub async fn update_missing_value(
    State(app): State<AppState>,
    Path((kind, _name)): Path<(String, String)>,
) -> ApiError {
    let err = match kind.parse::<MetricKind>() {
        Ok(_) => MetrixError::BadRequest("metric value is required".into()),
        Err(e) => e,
    };
    rejected(&app, &kind, err)
}

/// `POST /update/{kind}` with no name segment.
pub async fn update_missing_name(State(app): State<AppState>, Path(kind): Path<String>) -> ApiError {
    let err = match kind.parse::<MetricKind>() {
        Ok(_) => MetrixError::MissingName,
        Err(e) => e,
    };
    rejected(&app, &kind, err)
}

fn rejected(app: &AppState, kind: &str, err: MetrixError) -> ApiError {
    let label = if kind.parse::<MetricKind>().is_ok() { kind } else { "invalid" };
    app.metrics()
        .updates
        .inc(&[("kind", label), ("outcome", err.client_code().as_str())]);
    tracing::warn!(kind = %kind, error = %err, "update rejected");
    ApiError::update(err)
}

/// `POST /updates` with a JSON array body.
pub async fn update_batch(State(app): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let items = decode_batch(&body).map_err(ApiError::update)?;
    let applied = app.dispatcher().update_batch(items).map_err(ApiError::update)?;
    Ok((StatusCode::OK, Json(json!({ "applied": applied }))).into_response())
}

/// `GET /value/{kind}/{name}`
pub async fn value(
    State(app): State<AppState>,
    Path((kind, name)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let v = app.dispatcher().value(&kind, &name).map_err(ApiError::query)?;
    Ok((StatusCode::OK, [(header::CONTENT_TYPE, TEXT_PLAIN)], v.to_string()).into_response())
}

/// `GET /metrics`: every stored metric as JSON, grouped by kind.
pub async fn list_json(State(app): State<AppState>) -> Response {
    let snap = app.dispatcher().snapshot();
    Json(json!({
        "gauges": snap.gauges,
        "counters": snap.counters,
    }))
    .into_response()
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, [(header::CONTENT_TYPE, TEXT_PLAIN)], "not found")
}
