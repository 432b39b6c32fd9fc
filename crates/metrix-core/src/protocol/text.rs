//! Text lane: path-encoded updates and plain-text replies.

use crate::metric::MetricUpdate;

/// Content type for every plain-text request and reply.
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Confirmation body for an accepted update.
pub fn updated_message(name: &str) -> String {
    format!("Metric {name} updated successfully")
}

/// Full URL for `update` against `base` (e.g. `http://localhost:8080`).
pub fn update_url(base: &str, update: &MetricUpdate) -> String {
    format!("{}{}", base.trim_end_matches('/'), update.path())
}
