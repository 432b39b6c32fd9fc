//! Update/query dispatch.
//!
//! Decodes raw `{kind, name, value}` triples and JSON batches, enforces the
//! counter policy, and delegates to the store. Nothing reaches the store
//! until the whole request has validated.

pub mod dispatcher;

pub use dispatcher::{CounterPolicy, Dispatcher};
