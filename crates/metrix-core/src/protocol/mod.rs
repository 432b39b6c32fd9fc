//! Wire formats between agent and server.
//!
//! Two encodings carry the same `MetricUpdate`:
//! - Text: one metric per request, `POST /update/{kind}/{name}/{value}`.
//! - JSON: a batch of `MetricJson` items posted to `/updates`.
//!
//! Decoders are panic-free: malformed input is reported as `MetrixError`.

pub mod json;
pub mod text;
