//! Server configuration.
//!
//! Each setting resolves from the environment, then the command line, then an
//! optional strict YAML file, then the built-in default. The result is one
//! `ServerConfig` handed to `AppState::new`; handlers never read globals.

pub mod schema;

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use metrix_core::error::{MetrixError, Result};
use metrix_core::settings::{self, EnvSource};

use crate::dispatch::CounterPolicy;

pub use schema::{ServerConfig, ServerFileConfig, ServerSection};

/// Command-line flags.
#[derive(Debug, Default, Parser)]
#[command(name = "metrix-server", about = "Metric aggregation server")]
pub struct ServerCli {
    /// HTTP listen address (host:port).
    #[arg(short = 'a', long)]
    pub address: Option<String>,

    /// Optional YAML config file.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Negative counter deltas: reject_negative | allow_negative.
    #[arg(long)]
    pub counter_policy: Option<CounterPolicy>,
}

pub fn load_from_file(path: &std::path::Path) -> Result<ServerFileConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MetrixError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServerFileConfig> {
    let cfg: ServerFileConfig = serde_yaml::from_str(s)
        .map_err(|e| MetrixError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Merge every layer into the final config.
pub fn resolve<E: EnvSource + ?Sized>(cli: &ServerCli, env: &E) -> Result<ServerConfig> {
    let file = match &cli.config {
        Some(path) => load_from_file(path)?.server,
        None => ServerSection::default(),
    };

    let cfg = ServerConfig {
        address: settings::resolve(
            env,
            "ADDRESS",
            cli.address.clone(),
            file.address,
            schema::default_address(),
        ),
        counter_policy: settings::resolve(
            env,
            "COUNTER_POLICY",
            cli.counter_policy,
            file.counter_policy,
            CounterPolicy::default(),
        ),
    };
    cfg.validate()?;
    Ok(cfg)
}
