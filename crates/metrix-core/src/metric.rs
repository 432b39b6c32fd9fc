//! Metric kinds, values, and the update unit.
//!
//! Gauges and counters live in independent namespaces: the same name may be
//! stored as both without conflict. The kind is carried in the value itself
//! (`MetricValue::Gauge(f64)` / `MetricValue::Counter(i64)`), so a gauge can
//! never be stored or formatted as an integer by accident.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MetrixError, Result};

/// The two supported metric kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Last write wins.
    Gauge,
    /// Deltas accumulate.
    Counter,
}

impl MetricKind {
    /// Wire name (`gauge` / `counter`).
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = MetrixError;

    /// Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gauge" => Ok(MetricKind::Gauge),
            "counter" => Ok(MetricKind::Counter),
            other => Err(MetrixError::InvalidKind(other.to_string())),
        }
    }
}

/// A typed metric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Gauge(f64),
    Counter(i64),
}

impl MetricValue {
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricValue::Gauge(_) => MetricKind::Gauge,
            MetricValue::Counter(_) => MetricKind::Counter,
        }
    }

    /// Parse value text for `kind`: `f64` for gauges, `i64` for counters.
    pub fn parse(kind: MetricKind, text: &str) -> Result<Self> {
        let invalid = || MetrixError::InvalidValue {
            kind,
            value: text.to_string(),
        };
        match kind {
            MetricKind::Gauge => text.parse::<f64>().map(MetricValue::Gauge).map_err(|_| invalid()),
            MetricKind::Counter => text.parse::<i64>().map(MetricValue::Counter).map_err(|_| invalid()),
        }
    }
}

impl fmt::Display for MetricValue {
    /// Wire text. `f64`'s `Display` is the shortest round-trip form and never
    /// switches to exponent notation, so `36.6` stays `36.6` and `1.0` is `1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Gauge(v) => write!(f, "{v}"),
            MetricValue::Counter(v) => write!(f, "{v}"),
        }
    }
}

/// One update: a named metric and its new value (gauge) or delta (counter).
#[derive(Debug, Clone, PartialEq)]
pub struct MetricUpdate {
    pub name: String,
    pub value: MetricValue,
}

impl MetricUpdate {
    pub fn gauge(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: MetricValue::Gauge(value),
        }
    }

    pub fn counter(name: impl Into<String>, delta: i64) -> Self {
        Self {
            name: name.into(),
            value: MetricValue::Counter(delta),
        }
    }

    /// Decode a raw `{kind, name, value}` triple.
    ///
    /// Check order: kind, then name, then value text.
    pub fn from_parts(kind: &str, name: &str, value: &str) -> Result<Self> {
        let kind: MetricKind = kind.parse()?;
        if name.is_empty() {
            return Err(MetrixError::MissingName);
        }
        let value = MetricValue::parse(kind, value)?;
        Ok(Self {
            name: name.to_string(),
            value,
        })
    }

    pub fn kind(&self) -> MetricKind {
        self.value.kind()
    }

    /// Request path for the text update endpoint.
    pub fn path(&self) -> String {
        format!("/update/{}/{}/{}", self.kind(), self.name, self.value)
    }
}
