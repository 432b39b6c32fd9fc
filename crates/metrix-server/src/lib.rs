//! metrix server library entry.
//!
//! This crate wires the metric store, the update/query dispatcher, the HTTP
//! handlers and the operational endpoints into one axum application. It is
//! consumed by the binary (`main.rs`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod dispatch;
pub mod obs;
pub mod ops;
pub mod router;
pub mod storage;
