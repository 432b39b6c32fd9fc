use std::time::Duration;

use serde::Deserialize;
use metrix_core::error::{MetrixError, Result};

use crate::reporter::ReportMode;

pub const DEFAULT_POLL_SECS: u64 = 2;
pub const DEFAULT_REPORT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

const REQUEST_TIMEOUT_RANGE_MS: std::ops::RangeInclusive<u64> = 100..=60_000;

/// On-disk YAML layout.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentFileConfig {
    pub version: u32,

    #[serde(default)]
    pub agent: AgentSection,
}

impl AgentFileConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MetrixError::BadRequest(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        let a = &self.agent;
        if let Some(addr) = &a.address {
            validate_address(addr)?;
        }
        if let Some(secs) = a.poll_interval_secs {
            validate_interval("agent.poll_interval_secs", secs)?;
        }
        if let Some(secs) = a.report_interval_secs {
            validate_interval("agent.report_interval_secs", secs)?;
        }
        if let Some(ms) = a.request_timeout_ms {
            validate_timeout(ms)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentSection {
    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub poll_interval_secs: Option<u64>,

    #[serde(default)]
    pub report_interval_secs: Option<u64>,

    #[serde(default)]
    pub request_timeout_ms: Option<u64>,

    #[serde(default)]
    pub batch: Option<bool>,
}

/// Fully resolved agent settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub address: String,
    pub poll_interval: Duration,
    pub report_interval: Duration,
    pub request_timeout: Duration,
    pub batch: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
            report_interval: Duration::from_secs(DEFAULT_REPORT_SECS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            batch: false,
        }
    }
}

impl AgentConfig {
    /// Checks the resolved values. Sub-second intervals are allowed here so
    /// embedders and tests can run fast loops; the layered sources only speak
    /// whole seconds and are checked at `>= 1` on the way in.
    pub fn validate(&self) -> Result<()> {
        validate_address(&self.address)?;
        if self.poll_interval.is_zero() || self.report_interval.is_zero() {
            return Err(MetrixError::BadRequest("intervals must be non-zero".into()));
        }
        let ms = u64::try_from(self.request_timeout.as_millis()).unwrap_or(u64::MAX);
        validate_timeout(ms)
    }

    pub fn report_mode(&self) -> ReportMode {
        if self.batch {
            ReportMode::Batch
        } else {
            ReportMode::PerMetric
        }
    }
}

/// `host:port`, or a full `http://` / `https://` base URL.
pub(crate) fn validate_address(addr: &str) -> Result<()> {
    let addr = addr.trim();
    if addr.is_empty() {
        return Err(MetrixError::BadRequest("agent.address must not be empty".into()));
    }
    match addr.split_once("://") {
        None => Ok(()),
        Some(("http" | "https", rest)) if !rest.is_empty() => Ok(()),
        Some(_) => Err(MetrixError::BadRequest(format!(
            "agent.address must use http or https, got {addr:?}"
        ))),
    }
}

pub(crate) fn validate_interval(field: &str, secs: u64) -> Result<()> {
    if secs == 0 {
        return Err(MetrixError::BadRequest(format!("{field} must be >= 1 second")));
    }
    Ok(())
}

fn validate_timeout(ms: u64) -> Result<()> {
    if !REQUEST_TIMEOUT_RANGE_MS.contains(&ms) {
        return Err(MetrixError::BadRequest(format!(
            "agent.request_timeout_ms must be within 100..=60000, got {ms}"
        )));
    }
    Ok(())
}

pub(crate) fn default_address() -> String {
    "localhost:8080".into()
}
