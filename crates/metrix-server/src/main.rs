//! metrix server
//!
//! - `POST /update/{type}/{name}/{value}` : apply one gauge/counter update
//! - `POST /updates`                       : JSON batch
//! - `GET  /value/{type}/{name}`           : current value as text
//! - `GET  /`                              : HTML listing

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use metrix_core::settings::ProcessEnv;
use metrix_server::{app_state, config, router};

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = config::ServerCli::parse();
    let cfg = match config::resolve(&cli, &ProcessEnv) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, "config load failed");
            return ExitCode::FAILURE;
        }
    };

    let state = app_state::AppState::new(cfg);
    let address = state.cfg().address.clone();
    let policy = state.dispatcher().policy();
    let app = router::build_router(state);

    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%address, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%address, counter_policy = %policy, "metrix-server starting");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("metrix-server stopped");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
