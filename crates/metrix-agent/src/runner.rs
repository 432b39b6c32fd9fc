//! Poll/report scheduler.
//!
//! Two independent intervals share one `select!` loop. The poll arm mutates
//! the producer in place; the report arm clones the snapshot and hands it to
//! a spawned task, so polling never waits on the network. At most one report
//! task exists at a time: a report tick that finds the previous one still
//! running is skipped.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use metrix_core::error::Result;

use crate::config::AgentConfig;
use crate::reporter::{ReportSummary, Reporter};
use crate::snapshot::Producer;

/// Loop totals, returned when `run` ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub polls: u64,
    pub reports: u64,
    pub skipped: u64,
    pub sent: usize,
    pub failed: usize,
}

impl RunStats {
    fn absorb(&mut self, s: ReportSummary) {
        self.sent += s.sent;
        self.failed += s.failed;
    }
}

pub async fn run<F>(cfg: AgentConfig, shutdown: F) -> Result<RunStats>
where
    F: Future<Output = ()>,
{
    run_with(cfg, Producer::new(), shutdown).await
}

/// Same as [`run`] with a caller-supplied producer.
pub async fn run_with<F>(cfg: AgentConfig, mut producer: Producer, shutdown: F) -> Result<RunStats>
where
    F: Future<Output = ()>,
{
    cfg.validate()?;
    let reporter = Arc::new(Reporter::new(&cfg)?);

    let start = Instant::now();
    let mut poll_tick = time::interval_at(start + cfg.poll_interval, cfg.poll_interval);
    poll_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut report_tick = time::interval_at(start + cfg.report_interval, cfg.report_interval);
    report_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(
        server = %reporter.base(),
        poll_ms = cfg.poll_interval.as_millis() as u64,
        report_ms = cfg.report_interval.as_millis() as u64,
        batch = cfg.batch,
        "metrix-agent running"
    );

    let mut stats = RunStats::default();
    let mut in_flight: Option<JoinHandle<ReportSummary>> = None;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => break,

            _ = poll_tick.tick() => {
                producer.poll();
                stats.polls += 1;
            }

            _ = report_tick.tick() => {
                if in_flight.as_ref().is_some_and(|h| !h.is_finished()) {
                    stats.skipped += 1;
                    tracing::debug!("previous report still running, skipping tick");
                    continue;
                }
                if let Some(done) = in_flight.take() {
                    join_report(done, &mut stats).await;
                }

                let snapshot = producer.snapshot();
                let reporter = Arc::clone(&reporter);
                in_flight = Some(tokio::spawn(async move { reporter.report(&snapshot).await }));
                stats.reports += 1;
            }
        }
    }

    if let Some(last) = in_flight.take() {
        join_report(last, &mut stats).await;
    }

    tracing::info!(
        polls = stats.polls,
        reports = stats.reports,
        skipped = stats.skipped,
        sent = stats.sent,
        failed = stats.failed,
        "metrix-agent stopped"
    );
    Ok(stats)
}

async fn join_report(handle: JoinHandle<ReportSummary>, stats: &mut RunStats) {
    match handle.await {
        Ok(summary) => stats.absorb(summary),
        Err(e) => tracing::error!(error = %e, "report task failed"),
    }
}
