//! The dispatcher and its counter policy.
//!
//! Every accepted or rejected update is counted in `ServerMetrics` with a
//! bounded `kind` label; unknown kinds are folded into `invalid`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

use metrix_core::error::{MetrixError, Result};
use metrix_core::protocol::json::MetricJson;
use metrix_core::{MetricUpdate, MetricValue};

use crate::obs::metrics::ServerMetrics;
use crate::storage::{MetricsSnapshot, Storage};

/// What to do with a negative counter delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterPolicy {
    #[default]
    RejectNegative,
    AllowNegative,
}

impl CounterPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            CounterPolicy::RejectNegative => "reject_negative",
            CounterPolicy::AllowNegative => "allow_negative",
        }
    }

    fn check(self, update: &MetricUpdate) -> Result<()> {
        match (self, update.value) {
            (CounterPolicy::RejectNegative, MetricValue::Counter(delta)) if delta < 0 => {
                Err(MetrixError::NegativeCounter {
                    name: update.name.clone(),
                    delta,
                })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for CounterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CounterPolicy {
    type Err = MetrixError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "reject_negative" => Ok(CounterPolicy::RejectNegative),
            "allow_negative" => Ok(CounterPolicy::AllowNegative),
            other => Err(MetrixError::BadRequest(format!("unknown counter policy: {other}"))),
        }
    }
}

/// Validates requests and applies them to the store.
pub struct Dispatcher {
    storage: Arc<dyn Storage>,
    policy: CounterPolicy,
    metrics: Arc<ServerMetrics>,
}

impl Dispatcher {
    pub fn new(storage: Arc<dyn Storage>, policy: CounterPolicy, metrics: Arc<ServerMetrics>) -> Self {
        Self {
            storage,
            policy,
            metrics,
        }
    }

    pub fn policy(&self) -> CounterPolicy {
        self.policy
    }

    /// Decode and apply one text-lane update.
    pub fn update(&self, kind: &str, name: &str, value: &str) -> Result<MetricUpdate> {
        let res = MetricUpdate::from_parts(kind, name, value).and_then(|u| {
            self.policy.check(&u)?;
            Ok(u)
        });

        match res {
            Ok(u) => {
                self.storage.apply(&u);
                self.record_update(u.kind().as_str(), "ok");
                tracing::debug!(kind = %u.kind(), name = %u.name, value = %u.value, "metric updated");
                Ok(u)
            }
            Err(e) => {
                self.record_update(kind, e.client_code().as_str());
                tracing::warn!(kind = %kind, name = %name, value = %value, error = %e, "update rejected");
                Err(e)
            }
        }
    }

    /// Validate every item, then apply them all in one store step.
    /// Returns the number of applied updates.
    pub fn update_batch(&self, items: Vec<MetricJson>) -> Result<usize> {
        let mut updates = Vec::with_capacity(items.len());
        for item in items {
            let kind = item.kind.clone();
            let u = match item.into_update().and_then(|u| {
                self.policy.check(&u)?;
                Ok(u)
            }) {
                Ok(u) => u,
                Err(e) => {
                    self.record_update(&kind, e.client_code().as_str());
                    tracing::warn!(kind = %kind, error = %e, "batch rejected");
                    return Err(e);
                }
            };
            updates.push(u);
        }

        self.storage.apply_all(&updates);
        for u in &updates {
            self.record_update(u.kind().as_str(), "ok");
        }
        tracing::debug!(count = updates.len(), "batch applied");
        Ok(updates.len())
    }

    /// Look up one metric for the query path.
    pub fn value(&self, kind: &str, name: &str) -> Result<MetricValue> {
        let res = self.storage.get_metric(kind, name);
        let outcome = match &res {
            Ok(_) => "ok",
            Err(e) => e.client_code().as_str(),
        };
        self.metrics.queries.inc(&[("outcome", outcome)]);
        res
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.storage.get_all_metrics()
    }

    fn record_update(&self, kind: &str, outcome: &str) {
        // Only label with known kinds so bogus input can't grow the registry.
        let kind = match kind {
            "gauge" | "counter" => kind,
            _ => "invalid",
        };
        self.metrics.updates.inc(&[("kind", kind), ("outcome", outcome)]);
        if outcome == "ok" {
            self.metrics.stored_metrics.set(self.storage.len() as i64);
        }
    }
}
