//! Controller config loader (strict parsing).

pub mod schema;

use std::fs;

use meshpolicy_core::error::{MeshPolicyError, Result};

pub use schema::{ControllerConfig, ControllerSection, SourceConfig};

/// Used when `MESHPOLICY_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "meshpolicy.yaml";

pub fn load_from_file(path: &str) -> Result<ControllerConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MeshPolicyError::InvalidConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ControllerConfig> {
    let cfg: ControllerConfig = serde_yaml::from_str(s)
        .map_err(|e| MeshPolicyError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
