//! Snapshot reporter.
//!
//! One report cycle sends every metric of a snapshot, either one request per
//! metric (text lane) or as one JSON batch. Sends within a cycle are serial.
//! Any transport error or non-200 reply is logged and counted, and the cycle
//! moves on to the next metric: nothing is retried.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

use metrix_core::error::{MetrixError, Result};
use metrix_core::protocol::json::MetricJson;
use metrix_core::protocol::text::{update_url, TEXT_PLAIN};
use metrix_core::MetricUpdate;

use crate::config::AgentConfig;
use crate::snapshot::Snapshot;

/// How a snapshot travels to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// `POST /update/{kind}/{name}/{value}` per metric.
    #[default]
    PerMetric,
    /// One `POST /updates` with a JSON array.
    Batch,
}

/// Outcome of one report cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub sent: usize,
    pub failed: usize,
}

pub struct Reporter {
    client: reqwest::Client,
    base: String,
    mode: ReportMode,
}

impl Reporter {
    pub fn new(cfg: &AgentConfig) -> Result<Self> {
        Self::with_parts(&cfg.address, cfg.request_timeout, cfg.report_mode())
    }

    pub fn with_parts(address: &str, timeout: Duration, mode: ReportMode) -> Result<Self> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()
            .map_err(|e| MetrixError::Internal(format!("http client build failed: {e}")))?;
        Ok(Self {
            client,
            base: base_url(address),
            mode,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Send a whole snapshot. Never fails: per-metric errors are logged.
    pub async fn report(&self, snapshot: &Snapshot) -> ReportSummary {
        if snapshot.is_empty() {
            return ReportSummary::default();
        }
        let updates = snapshot.updates();
        let summary = match self.mode {
            ReportMode::PerMetric => {
                let mut summary = ReportSummary::default();
                for u in &updates {
                    match self.send(u).await {
                        Ok(()) => summary.sent += 1,
                        Err(e) => {
                            summary.failed += 1;
                            tracing::warn!(kind = %u.kind(), name = %u.name, error = %e, "metric not delivered");
                        }
                    }
                }
                summary
            }
            ReportMode::Batch => match self.send_batch(&updates).await {
                Ok(()) => ReportSummary {
                    sent: updates.len(),
                    failed: 0,
                },
                Err(e) => {
                    tracing::warn!(count = updates.len(), error = %e, "batch not delivered");
                    ReportSummary {
                        sent: 0,
                        failed: updates.len(),
                    }
                }
            },
        };

        tracing::info!(sent = summary.sent, failed = summary.failed, "report cycle done");
        summary
    }

    /// Deliver one metric over the text lane.
    pub async fn send(&self, update: &MetricUpdate) -> Result<()> {
        let resp = self
            .client
            .post(update_url(&self.base, update))
            .header(CONTENT_TYPE, TEXT_PLAIN)
            .send()
            .await
            .map_err(|e| MetrixError::Transport(format!("send failed: {e}")))?;
        check_status(resp.status())
    }

    /// Deliver several metrics as one JSON batch.
    pub async fn send_batch(&self, updates: &[MetricUpdate]) -> Result<()> {
        let items: Vec<MetricJson> = updates.iter().map(MetricJson::from).collect();
        let body = serde_json::to_vec(&items)
            .map_err(|e| MetrixError::Internal(format!("encode batch failed: {e}")))?;

        let resp = self
            .client
            .post(format!("{}/updates", self.base))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| MetrixError::Transport(format!("send failed: {e}")))?;
        check_status(resp.status())
    }
}

fn check_status(status: StatusCode) -> Result<()> {
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(MetrixError::Transport(format!("unexpected response code: {status}")))
    }
}

/// `host:port` gets an `http://` scheme; anything with a scheme is kept.
pub fn base_url(address: &str) -> String {
    let addr = address.trim().trim_end_matches('/');
    if addr.contains("://") {
        addr.to_string()
    } else {
        format!("http://{addr}")
    }
}
