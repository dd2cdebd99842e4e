//! Shared application state for the controller.
//!
//! Builds discovery sources from config, wires the reconciler to the snapshot
//! store and metrics, and hands clones to the HTTP handlers.

use std::path::Path;
use std::sync::Arc;

use meshpolicy_core::error::{MeshPolicyError, Result};

use crate::config::ControllerConfig;
use crate::discovery::{DiscoverySource, FileSource};
use crate::obs::ControllerMetrics;
use crate::reconcile::{Reconciler, SnapshotStore};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    store: Arc<SnapshotStore>,
    metrics: Arc<ControllerMetrics>,
    reconciler: Arc<Reconciler>,
}

struct AppStateInner {
    cfg: ControllerConfig,
}

impl AppState {
    /// Build application state with one `FileSource` per configured source.
    pub fn new(cfg: ControllerConfig) -> Result<Self> {
        let mut sources: Vec<Arc<dyn DiscoverySource>> = Vec::with_capacity(cfg.sources.len());
        for s in &cfg.sources {
            // Unless configured otherwise, a missing file is tolerated: it may
            // be written later, and until then passes fail and nothing is published.
            if !Path::new(&s.path).exists() {
                if cfg.controller.fail_fast_on_missing_source {
                    return Err(MeshPolicyError::InvalidConfig(format!(
                        "source {} path does not exist: {}",
                        s.name, s.path
                    )));
                }
                tracing::warn!(source = %s.name, path = %s.path, "discovery file does not exist yet");
            }
            sources.push(Arc::new(FileSource::new(s.name.clone(), s.path.clone())));
        }
        Ok(Self::with_sources(cfg, sources))
    }

    /// Build application state around caller-provided sources.
    pub fn with_sources(cfg: ControllerConfig, sources: Vec<Arc<dyn DiscoverySource>>) -> Self {
        let store = Arc::new(SnapshotStore::new());
        let metrics = Arc::new(ControllerMetrics::default());
        let reconciler = Arc::new(Reconciler::new(
            sources,
            cfg.merge,
            Arc::clone(&store),
            Arc::clone(&metrics),
        ));

        Self {
            inner: Arc::new(AppStateInner { cfg }),
            store,
            metrics,
            reconciler,
        }
    }

    pub fn cfg(&self) -> &ControllerConfig {
        &self.inner.cfg
    }

    pub fn store(&self) -> Arc<SnapshotStore> {
        Arc::clone(&self.store)
    }

    pub fn metrics(&self) -> Arc<ControllerMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn reconciler(&self) -> Arc<Reconciler> {
        Arc::clone(&self.reconciler)
    }

    /// Ready once a first snapshot has been published.
    pub fn is_ready(&self) -> bool {
        self.store.current().is_some()
    }
}
