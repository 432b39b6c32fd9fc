//! metrix core: transport-agnostic metric model, wire formats, and error types.
//!
//! This crate defines the update/query contract shared by the agent and the
//! server: the two metric kinds, their values and text encoding, the raw
//! `{kind, name, value}` triple decoder, and the JSON batch shape. It carries
//! no transport or runtime dependencies so both binaries (and tests) can use it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Every malformed input surfaces as `MetrixError`/`Result` so a bad request
//! never takes a process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metric;
pub mod protocol;
pub mod settings;

/// Shared result type.
pub use error::{MetrixError, Result};
pub use metric::{MetricKind, MetricUpdate, MetricValue};
