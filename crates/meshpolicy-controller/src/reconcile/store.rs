use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use meshpolicy_core::PolicySnapshot;

/// A snapshot as served to consumers.
#[derive(Debug, Serialize)]
pub struct PublishedSnapshot {
    /// Increases by one per successful pass, starting at 1.
    pub generation: u64,
    pub snapshot: PolicySnapshot,
}

/// Holds the last known-good snapshot. Readers get a cheap `Arc` clone.
#[derive(Default)]
pub struct SnapshotStore {
    current: RwLock<Option<Arc<PublishedSnapshot>>>,
    generation: AtomicU64,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, snapshot: PolicySnapshot) -> Arc<PublishedSnapshot> {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let published = Arc::new(PublishedSnapshot { generation, snapshot });
        // A poisoned lock only means a reader panicked; the slot itself is
        // still a valid Option.
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&published));
        published
    }

    pub fn current(&self) -> Option<Arc<PublishedSnapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }
}
