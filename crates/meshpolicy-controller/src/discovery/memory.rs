//! In-memory source fed by an embedding process.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use meshpolicy_core::error::{MeshPolicyError, Result};
use meshpolicy_core::DiscoveredPolicies;

use super::DiscoverySource;

/// Serves whatever batch was last `set`. With no batch set, discovery fails
/// so the pass keeps the previous snapshot instead of publishing a gap.
#[derive(Debug, Default)]
pub struct MemorySource {
    name: String,
    batch: Mutex<Option<DiscoveredPolicies>>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            batch: Mutex::new(None),
        }
    }

    pub fn set(&self, batch: DiscoveredPolicies) {
        *self.batch.lock().unwrap_or_else(PoisonError::into_inner) = Some(batch);
    }

    pub fn clear(&self) {
        *self.batch.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[async_trait]
impl DiscoverySource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn discover(&self) -> Result<DiscoveredPolicies> {
        self.batch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| MeshPolicyError::Discovery {
                source_name: self.name.clone(),
                reason: "no batch available".into(),
            })
    }
}
