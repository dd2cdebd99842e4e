//! YAML file source.

use std::path::PathBuf;

use async_trait::async_trait;

use meshpolicy_core::error::{MeshPolicyError, Result};
use meshpolicy_core::DiscoveredPolicies;

use super::DiscoverySource;

/// Reads a `DiscoveredPolicies` YAML document from disk on every pass.
#[derive(Debug, Clone)]
pub struct FileSource {
    name: String,
    path: PathBuf,
}

impl FileSource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn failed(&self, reason: String) -> MeshPolicyError {
        MeshPolicyError::Discovery {
            source_name: self.name.clone(),
            reason,
        }
    }
}

#[async_trait]
impl DiscoverySource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn discover(&self) -> Result<DiscoveredPolicies> {
        let s = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.failed(format!("read {} failed: {e}", self.path.display())))?;
        serde_yaml::from_str(&s).map_err(|e| self.failed(format!("invalid yaml: {e}")))
    }
}
