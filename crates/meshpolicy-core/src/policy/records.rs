//! Records identified purely by content.
//!
//! Both types are fed to the dedup engine, which treats every sequence field
//! as an unordered multiset: two matches listing the same server names in a
//! different order are the same record.

use serde::{Deserialize, Serialize};

use super::route::WeightedCluster;

/// Listener-level traffic match (destination port/protocol/ranges/SNI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrafficMatch {
    pub name: String,
    pub destination_port: u16,
    pub destination_protocol: String,
    #[serde(default)]
    pub destination_ip_ranges: Vec<String>,
    #[serde(default)]
    pub server_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(default)]
    pub weighted_clusters: Vec<WeightedCluster>,
}

/// Egress cluster definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EgressClusterConfig {
    pub name: String,
    pub host: String,
    pub port: u16,
}
