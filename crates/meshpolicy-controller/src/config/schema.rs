use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

use meshpolicy_core::error::{MeshPolicyError, Result};
use meshpolicy_core::SnapshotOptions;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerConfig {
    pub version: u32,

    #[serde(default)]
    pub controller: ControllerSection,

    /// Hostname matching per bundle origin.
    #[serde(default)]
    pub merge: SnapshotOptions,

    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MeshPolicyError::InvalidConfig(format!(
                "unsupported config version {}",
                self.version
            )));
        }
        if self.sources.is_empty() {
            return Err(MeshPolicyError::InvalidConfig("sources must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for s in &self.sources {
            s.validate()?;
            if !seen.insert(s.name.as_str()) {
                return Err(MeshPolicyError::InvalidConfig(format!(
                    "duplicate source name: {}",
                    s.name
                )));
            }
        }

        self.controller.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_resync_interval_ms")]
    pub resync_interval_ms: u64,

    /// Refuse to boot when a source file does not exist yet.
    #[serde(default)]
    pub fail_fast_on_missing_source: bool,
}

impl Default for ControllerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            resync_interval_ms: default_resync_interval_ms(),
            fail_fast_on_missing_source: false,
        }
    }
}

impl ControllerSection {
    pub fn validate(&self) -> Result<()> {
        if !(1000..=3_600_000).contains(&self.resync_interval_ms) {
            return Err(MeshPolicyError::InvalidConfig(
                "controller.resync_interval_ms must be between 1000 and 3600000".into(),
            ));
        }
        Ok(())
    }

    pub fn resync_interval(&self) -> Duration {
        Duration::from_millis(self.resync_interval_ms)
    }
}

fn default_listen() -> String {
    "0.0.0.0:9090".into()
}
fn default_resync_interval_ms() -> u64 {
    10000
}

/// A file-backed discovery source, re-read on every pass.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub name: String,
    pub path: String,
}

impl SourceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MeshPolicyError::InvalidConfig("source name must not be empty".into()));
        }
        if self.path.trim().is_empty() {
            return Err(MeshPolicyError::InvalidConfig(format!(
                "source {} path must not be empty",
                self.name
            )));
        }
        Ok(())
    }
}
