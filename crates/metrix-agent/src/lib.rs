//! metrix agent library entry.
//!
//! The agent samples process and allocator statistics on a poll interval and
//! pushes the current snapshot to the server on an independent report
//! interval. Delivery is fire-and-forget: failures are logged per metric and
//! never stop the loop.

pub mod alloc_stats;
pub mod config;
pub mod reporter;
pub mod runner;
pub mod snapshot;

#[cfg(all(test, not(target_env = "msvc")))]
#[global_allocator]
static TEST_ALLOC: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;
