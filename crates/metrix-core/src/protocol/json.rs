//! JSON lane: batch updates.
//!
//! Item shape: `{"id": "...", "type": "gauge", "value": 1.5}` or
//! `{"id": "...", "type": "counter", "delta": 3}`. `type` is kept as a raw
//! string so an unknown kind is reported as `InvalidKind`, not a serde error.

use serde::{Deserialize, Serialize};

use crate::error::{MetrixError, Result};
use crate::metric::{MetricKind, MetricUpdate, MetricValue};

/// One batch item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricJson {
    /// Metric name.
    pub id: String,
    /// Metric kind (field name is `type` in JSON).
    #[serde(rename = "type")]
    pub kind: String,
    /// Counter delta.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<i64>,
    /// Gauge value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl MetricJson {
    /// Validate and convert into a typed update.
    pub fn into_update(self) -> Result<MetricUpdate> {
        let kind: MetricKind = self.kind.parse()?;
        if self.id.is_empty() {
            return Err(MetrixError::MissingName);
        }
        let value = match kind {
            MetricKind::Gauge => self.value.map(MetricValue::Gauge),
            MetricKind::Counter => self.delta.map(MetricValue::Counter),
        }
        .ok_or_else(|| MetrixError::InvalidValue {
            kind,
            value: "<missing>".to_string(),
        })?;
        Ok(MetricUpdate { name: self.id, value })
    }
}

impl From<&MetricUpdate> for MetricJson {
    fn from(u: &MetricUpdate) -> Self {
        let (delta, value) = match u.value {
            MetricValue::Gauge(v) => (None, Some(v)),
            MetricValue::Counter(d) => (Some(d), None),
        };
        Self {
            id: u.name.clone(),
            kind: u.kind().as_str().to_string(),
            delta,
            value,
        }
    }
}

/// Decode a JSON batch body.
pub fn decode_batch(body: &[u8]) -> Result<Vec<MetricJson>> {
    serde_json::from_slice(body).map_err(|e| MetrixError::BadRequest(format!("invalid json batch: {e}")))
}
