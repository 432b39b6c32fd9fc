use serde::Deserialize;
use metrix_core::error::{MetrixError, Result};

use crate::dispatch::CounterPolicy;

/// On-disk YAML layout.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerFileConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,
}

impl ServerFileConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MetrixError::BadRequest(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        if let Some(addr) = &self.server.address {
            validate_address(addr)?;
        }
        Ok(())
    }
}

/// Every field is optional so env and flags can still fill the gaps.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub counter_policy: Option<CounterPolicy>,
}

/// Fully resolved server settings, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub address: String,
    pub counter_policy: CounterPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            counter_policy: CounterPolicy::default(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        validate_address(&self.address)
    }
}

pub(crate) fn validate_address(addr: &str) -> Result<()> {
    let addr = addr.trim();
    if addr.is_empty() {
        return Err(MetrixError::BadRequest("server.address must not be empty".into()));
    }
    match addr.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => Ok(()),
        _ => Err(MetrixError::BadRequest(format!(
            "server.address must be host:port, got {addr:?}"
        ))),
    }
}

pub(crate) fn default_address() -> String {
    "localhost:8080".into()
}
