//! Lightweight in-process self-metrics for the server.
//!
//! Request outcomes are counted with atomics and rendered in Prometheus text
//! format by the `/ops/metrics` handler. These are the server's own numbers,
//! separate from the metrics it stores on behalf of agents.

pub mod metrics;
