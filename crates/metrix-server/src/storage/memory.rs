use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use metrix_core::{MetricKind, MetricUpdate, MetricValue, MetrixError, Result};

use super::{MetricsSnapshot, Storage};

#[derive(Debug, Default)]
struct Maps {
    gauges: HashMap<String, f64>,
    counters: HashMap<String, i64>,
}

impl Maps {
    fn apply(&mut self, update: &MetricUpdate) {
        match update.value {
            MetricValue::Gauge(v) => {
                self.gauges.insert(update.name.clone(), v);
            }
            MetricValue::Counter(d) => {
                let c = self.counters.entry(update.name.clone()).or_insert(0);
                *c = c.wrapping_add(d);
            }
        }
    }
}

/// In-memory store: one mutex guards both namespaces.
///
/// Every operation holds the lock for its whole duration, so concurrent
/// counter updates never lose increments and `get_all_metrics` never sees a
/// half-applied batch.
#[derive(Debug, Default)]
pub struct MemStorage {
    inner: Mutex<Maps>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Maps> {
        // Poisoning only means another holder panicked; the maps hold plain
        // values and stay consistent, so keep serving instead of panicking.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Storage for MemStorage {
    fn update_gauge(&self, name: &str, value: f64) {
        self.lock().gauges.insert(name.to_string(), value);
    }

    fn update_counter(&self, name: &str, delta: i64) {
        let mut maps = self.lock();
        let c = maps.counters.entry(name.to_string()).or_insert(0);
        *c = c.wrapping_add(delta);
    }

    fn apply_all(&self, updates: &[MetricUpdate]) {
        let mut maps = self.lock();
        for u in updates {
            maps.apply(u);
        }
    }

    fn get(&self, kind: MetricKind, name: &str) -> Option<MetricValue> {
        let maps = self.lock();
        match kind {
            MetricKind::Gauge => maps.gauges.get(name).copied().map(MetricValue::Gauge),
            MetricKind::Counter => maps.counters.get(name).copied().map(MetricValue::Counter),
        }
    }

    fn get_metric(&self, kind: &str, name: &str) -> Result<MetricValue> {
        let kind: MetricKind = kind.parse()?;
        self.get(kind, name).ok_or_else(|| MetrixError::NotFound {
            kind,
            name: name.to_string(),
        })
    }

    fn get_all_metrics(&self) -> MetricsSnapshot {
        let maps = self.lock();
        MetricsSnapshot {
            gauges: maps.gauges.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            counters: maps.counters.iter().map(|(k, v)| (k.clone(), *v)).collect(),
        }
    }

    fn len(&self) -> usize {
        let maps = self.lock();
        maps.gauges.len() + maps.counters.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn gauge_is_replaced() {
        let s = MemStorage::new();
        s.update_gauge("gauge_metric", 10.5);
        s.update_gauge("gauge_metric", 3.25);
        assert_eq!(s.get(MetricKind::Gauge, "gauge_metric"), Some(MetricValue::Gauge(3.25)));
    }

    #[test]
    fn counter_accumulates_actual_delta() {
        let s = MemStorage::new();
        for d in [5, 3, 0, 12] {
            s.update_counter("counter_metric", d);
        }
        assert_eq!(s.get(MetricKind::Counter, "counter_metric"), Some(MetricValue::Counter(20)));
    }

    #[test]
    fn store_adds_negative_delta_unchecked() {
        let s = MemStorage::new();
        s.update_counter("c", 8);
        s.update_counter("c", -2);
        assert_eq!(s.get(MetricKind::Counter, "c"), Some(MetricValue::Counter(6)));
    }

    #[test]
    fn nan_and_inf_gauges_are_accepted() {
        let s = MemStorage::new();
        s.update_gauge("inf", f64::INFINITY);
        s.update_gauge("nan", f64::NAN);
        assert_eq!(s.get(MetricKind::Gauge, "inf"), Some(MetricValue::Gauge(f64::INFINITY)));
        match s.get(MetricKind::Gauge, "nan") {
            Some(MetricValue::Gauge(v)) => assert!(v.is_nan()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn namespaces_are_independent() {
        let s = MemStorage::new();
        s.update_gauge("dup", 1.5);
        assert!(s.get(MetricKind::Counter, "dup").is_none());

        s.update_counter("dup", 4);
        assert_eq!(s.get(MetricKind::Gauge, "dup"), Some(MetricValue::Gauge(1.5)));
        assert_eq!(s.get(MetricKind::Counter, "dup"), Some(MetricValue::Counter(4)));

        let all = s.get_all_metrics();
        assert_eq!(all.len(), 2);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn invalid_kind_differs_from_not_found() {
        let s = MemStorage::new();
        s.update_gauge("x", 1.0);

        let bad_kind = s.get_metric("bogus", "x").unwrap_err();
        assert_eq!(bad_kind.client_code().as_str(), "INVALID_KIND");

        let missing = s.get_metric("gauge", "y").unwrap_err();
        assert_eq!(missing.client_code().as_str(), "NOT_FOUND");

        let missing = s.get_metric("counter", "x").unwrap_err();
        assert_eq!(missing.client_code().as_str(), "NOT_FOUND");
    }

    #[test]
    fn empty_store_lists_nothing() {
        let s = MemStorage::new();
        assert!(s.is_empty());
        assert!(s.get_all_metrics().is_empty());
    }

    #[test]
    fn apply_all_is_one_step() {
        let s = MemStorage::new();
        s.apply_all(&[
            MetricUpdate::counter("hits", 2),
            MetricUpdate::gauge("temp", 20.0),
            MetricUpdate::counter("hits", 3),
        ]);
        let all = s.get_all_metrics();
        assert_eq!(all.counters.get("hits"), Some(&5));
        assert_eq!(all.gauges.get("temp"), Some(&20.0));
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let s = Arc::new(MemStorage::new());
        let threads: Vec<_> = (0..16)
            .map(|_| {
                let s = Arc::clone(&s);
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        s.update_counter("hits", 1);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(s.get(MetricKind::Counter, "hits"), Some(MetricValue::Counter(16 * 500)));
    }

    #[test]
    fn snapshot_iter_orders_gauges_then_counters() {
        let s = MemStorage::new();
        s.update_counter("a", 1);
        s.update_gauge("b", 2.0);
        s.update_gauge("a", 3.0);
        let all = s.get_all_metrics();
        let names: Vec<(&str, MetricKind)> = all.iter().map(|(n, v)| (n, v.kind())).collect();
        assert_eq!(
            names,
            vec![("a", MetricKind::Gauge), ("b", MetricKind::Gauge), ("a", MetricKind::Counter)]
        );
    }
}
