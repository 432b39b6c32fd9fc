//! Snapshot producer.
//!
//! `Producer::poll` overwrites every gauge from fresh allocator and process
//! statistics plus one random value, and bumps `PollCount`. It performs no
//! I/O and has no failure mode: a statistic that can't be read keeps its
//! previous value.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sysinfo::{Pid, ProcessesToUpdate, System};

use metrix_core::MetricUpdate;

use crate::alloc_stats::AllocStats;

pub const ALLOC: &str = "Alloc";
pub const HEAP_ALLOC: &str = "HeapAlloc";
pub const HEAP_INUSE: &str = "HeapInuse";
pub const HEAP_SYS: &str = "HeapSys";
pub const HEAP_RESIDENT: &str = "HeapResident";
pub const HEAP_RETAINED: &str = "HeapRetained";
pub const OTHER_SYS: &str = "OtherSys";
pub const SYS: &str = "Sys";
pub const RESIDENT_MEMORY: &str = "ResidentMemory";
pub const VIRTUAL_MEMORY: &str = "VirtualMemory";
pub const CPU_USAGE: &str = "CpuUsage";
pub const PROCESS_UPTIME: &str = "ProcessUptime";
pub const TOTAL_MEMORY: &str = "TotalMemory";
pub const USED_MEMORY: &str = "UsedMemory";
pub const FREE_MEMORY: &str = "FreeMemory";
pub const RANDOM_VALUE: &str = "RandomValue";

pub const POLL_COUNT: &str = "PollCount";

/// Every gauge the producer maintains.
pub const GAUGE_NAMES: [&str; 16] = [
    ALLOC,
    HEAP_ALLOC,
    HEAP_INUSE,
    HEAP_SYS,
    HEAP_RESIDENT,
    HEAP_RETAINED,
    OTHER_SYS,
    SYS,
    RESIDENT_MEMORY,
    VIRTUAL_MEMORY,
    CPU_USAGE,
    PROCESS_UPTIME,
    TOTAL_MEMORY,
    USED_MEMORY,
    FREE_MEMORY,
    RANDOM_VALUE,
];

/// Upper bound (exclusive) of `RandomValue`.
const RANDOM_GAUGE_MAX: f64 = 100.0;

/// The agent's current metric values.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub gauges: BTreeMap<String, f64>,
    pub counters: BTreeMap<String, i64>,
}

impl Default for Snapshot {
    /// All known gauges at 0 and `PollCount` at 0.
    fn default() -> Self {
        Self {
            gauges: GAUGE_NAMES.iter().map(|n| (n.to_string(), 0.0)).collect(),
            counters: BTreeMap::from([(POLL_COUNT.to_string(), 0)]),
        }
    }
}

impl Snapshot {
    /// One update per metric: gauges first, then counters.
    pub fn updates(&self) -> Vec<MetricUpdate> {
        let gauges = self.gauges.iter().map(|(n, v)| MetricUpdate::gauge(n.as_str(), *v));
        let counters = self.counters.iter().map(|(n, v)| MetricUpdate::counter(n.as_str(), *v));
        gauges.chain(counters).collect()
    }

    pub fn len(&self) -> usize {
        self.gauges.len() + self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gauges.is_empty() && self.counters.is_empty()
    }

    fn set(&mut self, name: &str, value: f64) {
        if let Some(slot) = self.gauges.get_mut(name) {
            *slot = value;
        }
    }
}

pub struct Producer {
    snapshot: Snapshot,
    system: System,
    pid: Option<Pid>,
    rng: StdRng,
}

impl Default for Producer {
    fn default() -> Self {
        Self::new()
    }
}

impl Producer {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic random gauge, for tests.
    pub fn with_rng(rng: StdRng) -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::warn!(error = %e, "current pid unavailable, process gauges stay at 0");
                None
            }
        };
        Self {
            snapshot: Snapshot::default(),
            system: System::new(),
            pid,
            rng,
        }
    }

    pub fn poll(&mut self) {
        let s = &mut self.snapshot;
        match AllocStats::read() {
            Ok(a) => {
                s.set(ALLOC, a.allocated as f64);
                s.set(HEAP_ALLOC, a.allocated as f64);
                s.set(HEAP_INUSE, a.active as f64);
                s.set(HEAP_SYS, a.mapped as f64);
                s.set(HEAP_RESIDENT, a.resident as f64);
                s.set(HEAP_RETAINED, a.retained as f64);
                s.set(OTHER_SYS, a.metadata as f64);
                s.set(SYS, a.obtained() as f64);
            }
            Err(e) => tracing::debug!(error = %e, "allocator stats unavailable"),
        }

        self.system.refresh_memory();
        s.set(TOTAL_MEMORY, self.system.total_memory() as f64);
        s.set(USED_MEMORY, self.system.used_memory() as f64);
        s.set(FREE_MEMORY, self.system.free_memory() as f64);

        if let Some(pid) = self.pid {
            self.system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
            if let Some(p) = self.system.process(pid) {
                s.set(RESIDENT_MEMORY, p.memory() as f64);
                s.set(VIRTUAL_MEMORY, p.virtual_memory() as f64);
                s.set(CPU_USAGE, f64::from(p.cpu_usage()));
                s.set(PROCESS_UPTIME, p.run_time() as f64);
            }
        }

        s.set(RANDOM_VALUE, self.rng.gen_range(0.0..RANDOM_GAUGE_MAX));

        let polls = s.counters.entry(POLL_COUNT.to_string()).or_insert(0);
        *polls += 1;
        tracing::trace!(poll_count = *polls, "snapshot polled");
    }

    /// Copy of the current values, safe to hand to a report task.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.clone()
    }

    pub fn poll_count(&self) -> i64 {
        self.snapshot.counters.get(POLL_COUNT).copied().unwrap_or(0)
    }
}
