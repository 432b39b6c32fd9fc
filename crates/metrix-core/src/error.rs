//! Shared error type across metrix crates.

use thiserror::Error;

use crate::metric::MetricKind;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Malformed request (path shape, body, config).
    BadRequest,
    /// Metric name missing or empty.
    MissingName,
    /// Metric type is neither `gauge` nor `counter`.
    InvalidKind,
    /// Value text does not parse for the kind, or violates counter policy.
    InvalidValue,
    /// Valid kind, but the metric was never updated.
    NotFound,
    /// Agent could not deliver an update.
    Transport,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs and test vectors.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::MissingName => "MISSING_NAME",
            ClientCode::InvalidKind => "INVALID_KIND",
            ClientCode::InvalidValue => "INVALID_VALUE",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::Transport => "TRANSPORT",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetrixError>;

/// Unified error type used by core, server and agent.
#[derive(Debug, Error)]
pub enum MetrixError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("metric name is required")]
    MissingName,
    #[error("invalid metric type: {0}")]
    InvalidKind(String),
    #[error("invalid {kind} value: {value}")]
    InvalidValue { kind: MetricKind, value: String },
    #[error("invalid counter value: {name} delta {delta} is negative")]
    NegativeCounter { name: String, delta: i64 },
    #[error("metric not found: {kind} {name}")]
    NotFound { kind: MetricKind, name: String },
    #[error("transport: {0}")]
    Transport(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl MetrixError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            MetrixError::BadRequest(_) => ClientCode::BadRequest,
            MetrixError::MissingName => ClientCode::MissingName,
            MetrixError::InvalidKind(_) => ClientCode::InvalidKind,
            MetrixError::InvalidValue { .. } => ClientCode::InvalidValue,
            MetrixError::NegativeCounter { .. } => ClientCode::InvalidValue,
            MetrixError::NotFound { .. } => ClientCode::NotFound,
            MetrixError::Transport(_) => ClientCode::Transport,
            MetrixError::Internal(_) => ClientCode::Internal,
        }
    }
}
