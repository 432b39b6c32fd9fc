//! Error -> HTTP response mapping.
//!
//! The same error can map to different statuses depending on the lane: an
//! unknown metric type is a bad update (400) but simply absent on the query
//! path (404).

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use metrix_core::error::{ClientCode, MetrixError};
use metrix_core::protocol::text::TEXT_PLAIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    Update,
    Query,
}

#[derive(Debug)]
pub struct ApiError {
    lane: Lane,
    err: MetrixError,
}

impl ApiError {
    pub fn update(err: MetrixError) -> Self {
        Self { lane: Lane::Update, err }
    }

    pub fn query(err: MetrixError) -> Self {
        Self { lane: Lane::Query, err }
    }

    pub fn status(&self) -> StatusCode {
        match (self.err.client_code(), self.lane) {
            (ClientCode::MissingName, _) => StatusCode::NOT_FOUND,
            (ClientCode::NotFound, _) => StatusCode::NOT_FOUND,
            (ClientCode::InvalidKind, Lane::Query) => StatusCode::NOT_FOUND,
            (ClientCode::InvalidKind, Lane::Update) => StatusCode::BAD_REQUEST,
            (ClientCode::InvalidValue, _) => StatusCode::BAD_REQUEST,
            (ClientCode::BadRequest, _) => StatusCode::BAD_REQUEST,
            (ClientCode::Transport, _) => StatusCode::BAD_GATEWAY,
            (ClientCode::Internal, _) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.err, "request failed");
        }
        (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], self.err.to_string()).into_response()
    }
}
