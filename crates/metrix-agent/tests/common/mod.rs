#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;

use metrix_agent::config::AgentConfig;
use metrix_server::app_state::AppState;
use metrix_server::config::ServerConfig;
use metrix_server::dispatch::Dispatcher;
use metrix_server::router;

/// A real metrix server on a loopback port. Returns its address and a handle
/// for inspecting what it stored.
pub async fn spawn_server() -> (String, Arc<Dispatcher>) {
    let state = AppState::new(ServerConfig::default());
    let dispatcher = state.dispatcher();
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server runs");
    });
    (addr.to_string(), dispatcher)
}

/// An address nothing listens on.
pub async fn dead_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    addr.to_string()
}

pub fn fast_config(address: String) -> AgentConfig {
    AgentConfig {
        address,
        poll_interval: Duration::from_millis(20),
        report_interval: Duration::from_millis(60),
        request_timeout: Duration::from_millis(1_000),
        batch: false,
    }
}

/// Counts requests in flight on a [`spawn_slow_server`].
#[derive(Debug, Default)]
pub struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
    total: AtomicUsize,
}

impl InFlight {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.total.fetch_add(1, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

/// A server that accepts every text-lane update after `delay`.
pub async fn spawn_slow_server(delay: Duration) -> (String, Arc<InFlight>) {
    let in_flight = Arc::new(InFlight::default());
    let tracker = Arc::clone(&in_flight);
    let app = axum::Router::new().route(
        "/update/:kind/:name/:value",
        post(move || {
            let tracker = Arc::clone(&tracker);
            async move {
                tracker.enter();
                tokio::time::sleep(delay).await;
                tracker.leave();
                StatusCode::OK
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server runs");
    });
    (addr.to_string(), in_flight)
}
