//! Metric store.
//!
//! `Storage` is the seam handlers and the dispatcher depend on; `MemStorage`
//! is the in-process implementation. Enumeration goes through
//! `MetricsSnapshot`, an owned copy taken atomically with respect to updates.

pub mod memory;

use std::collections::BTreeMap;

use metrix_core::{MetricKind, MetricUpdate, MetricValue, Result};

pub use memory::MemStorage;

/// Concurrency-safe metric aggregator.
pub trait Storage: Send + Sync {
    /// Replace the gauge value.
    fn update_gauge(&self, name: &str, value: f64);

    /// Add `delta` to the counter (absent counters start at 0).
    fn update_counter(&self, name: &str, delta: i64);

    /// Apply several updates under one lock acquisition.
    fn apply_all(&self, updates: &[MetricUpdate]);

    /// Typed lookup.
    fn get(&self, kind: MetricKind, name: &str) -> Option<MetricValue>;

    /// String-kind lookup: `InvalidKind` and `NotFound` are distinct errors.
    fn get_metric(&self, kind: &str, name: &str) -> Result<MetricValue>;

    /// Copy of every stored metric.
    fn get_all_metrics(&self) -> MetricsSnapshot;

    /// Number of stored entries across both namespaces.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn apply(&self, update: &MetricUpdate) {
        match update.value {
            MetricValue::Gauge(v) => self.update_gauge(&update.name, v),
            MetricValue::Counter(d) => self.update_counter(&update.name, d),
        }
    }
}

/// Point-in-time copy of both namespaces.
///
/// A name stored as both a gauge and a counter appears once in each map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub gauges: BTreeMap<String, f64>,
    pub counters: BTreeMap<String, i64>,
}

impl MetricsSnapshot {
    /// Gauges first, then counters, each ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, MetricValue)> + '_ {
        let gauges = self
            .gauges
            .iter()
            .map(|(k, v)| (k.as_str(), MetricValue::Gauge(*v)));
        let counters = self
            .counters
            .iter()
            .map(|(k, v)| (k.as_str(), MetricValue::Counter(*v)));
        gauges.chain(counters)
    }

    pub fn len(&self) -> usize {
        self.gauges.len() + self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gauges.is_empty() && self.counters.is_empty()
    }
}
