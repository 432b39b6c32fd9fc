//! Agent configuration.
//!
//! Same layering as the server: environment, then flags, then an optional
//! strict YAML file, then defaults. Intervals are whole seconds on every
//! external surface.

pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use metrix_core::error::{MetrixError, Result};
use metrix_core::settings::{self, EnvSource};

pub use schema::{AgentConfig, AgentFileConfig, AgentSection};

/// Command-line flags.
#[derive(Debug, Default, Parser)]
#[command(name = "metrix-agent", about = "Process metrics agent")]
pub struct AgentCli {
    /// Server address (host:port).
    #[arg(short = 'a', long)]
    pub address: Option<String>,

    /// Seconds between polls.
    #[arg(short = 'p', long)]
    pub poll_interval: Option<u64>,

    /// Seconds between reports.
    #[arg(short = 'r', long)]
    pub report_interval: Option<u64>,

    /// Optional YAML config file.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Report through the JSON batch endpoint.
    #[arg(long)]
    pub batch: bool,
}

pub fn load_from_file(path: &Path) -> Result<AgentFileConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MetrixError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AgentFileConfig> {
    let cfg: AgentFileConfig = serde_yaml::from_str(s)
        .map_err(|e| MetrixError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn resolve<E: EnvSource + ?Sized>(cli: &AgentCli, env: &E) -> Result<AgentConfig> {
    let file = match &cli.config {
        Some(path) => load_from_file(path)?.agent,
        None => AgentSection::default(),
    };

    let poll = settings::resolve(
        env,
        "POLL_INTERVAL",
        cli.poll_interval,
        file.poll_interval_secs,
        schema::DEFAULT_POLL_SECS,
    );
    schema::validate_interval("poll interval", poll)?;
    let report = settings::resolve(
        env,
        "REPORT_INTERVAL",
        cli.report_interval,
        file.report_interval_secs,
        schema::DEFAULT_REPORT_SECS,
    );
    schema::validate_interval("report interval", report)?;

    let cfg = AgentConfig {
        address: settings::resolve(
            env,
            "ADDRESS",
            cli.address.clone(),
            file.address,
            schema::default_address(),
        ),
        poll_interval: Duration::from_secs(poll),
        report_interval: Duration::from_secs(report),
        request_timeout: Duration::from_millis(
            file.request_timeout_ms.unwrap_or(schema::DEFAULT_REQUEST_TIMEOUT_MS),
        ),
        // A bare switch can't say "false", so an absent flag defers to lower layers.
        batch: settings::resolve(env, "BATCH", cli.batch.then_some(true), file.batch, false),
    };
    cfg.validate()?;
    Ok(cfg)
}
