//! Shared application state for the metrix server.
//!
//! Built once at startup from a resolved `ServerConfig`; cloned cheaply into
//! every handler.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::dispatch::Dispatcher;
use crate::obs::metrics::ServerMetrics;
use crate::storage::{MemStorage, Storage};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    dispatcher: Arc<Dispatcher>,
}

struct AppStateInner {
    cfg: ServerConfig,
    metrics: Arc<ServerMetrics>,
}

impl AppState {
    /// State backed by a fresh, empty in-memory store.
    pub fn new(cfg: ServerConfig) -> Self {
        Self::with_storage(cfg, Arc::new(MemStorage::new()))
    }

    pub fn with_storage(cfg: ServerConfig, storage: Arc<dyn Storage>) -> Self {
        let metrics = Arc::new(ServerMetrics::default());
        metrics.stored_metrics.set(storage.len() as i64);
        let dispatcher = Dispatcher::new(storage, cfg.counter_policy, Arc::clone(&metrics));

        Self {
            inner: Arc::new(AppStateInner { cfg, metrics }),
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> &ServerMetrics {
        &self.inner.metrics
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }
}
