//! Snapshot assembly: one full merge + dedup pass over discovery batches.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builder::DiscoveredPolicies;
use crate::dedup::{deduplicate_cluster_configs, deduplicate_traffic_matches};
use crate::error::Result;
use crate::merge::{merge_inbound_policies, merge_outbound_policies, HostnameMatch};
use crate::policy::{
    EgressClusterConfig, InboundTrafficPolicy, OutboundTrafficPolicy, RouteConflict, TrafficMatch,
};

/// Hostname matching mode per bundle origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotOptions {
    #[serde(default = "default_exact")]
    pub inbound: HostnameMatch,
    #[serde(default = "default_partial")]
    pub ingress: HostnameMatch,
    #[serde(default = "default_exact")]
    pub outbound: HostnameMatch,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            inbound: default_exact(),
            ingress: default_partial(),
            outbound: default_exact(),
        }
    }
}

fn default_exact() -> HostnameMatch {
    HostnameMatch::Exact
}
fn default_partial() -> HostnameMatch {
    HostnameMatch::Partial
}

/// Mesh-wide merged policy, rebuilt from scratch every pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySnapshot {
    pub inbound: Vec<InboundTrafficPolicy>,
    pub outbound: Vec<OutboundTrafficPolicy>,
    pub traffic_matches: Vec<TrafficMatch>,
    pub egress_cluster_configs: Vec<EgressClusterConfig>,
    /// Routes dropped while building outbound bundles.
    pub conflicts: Vec<RouteConflict>,
}

/// Entry counts, for logs and gauges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotSummary {
    pub inbound_policies: usize,
    pub inbound_rules: usize,
    pub outbound_policies: usize,
    pub outbound_routes: usize,
    pub traffic_matches: usize,
    pub egress_cluster_configs: usize,
    pub conflicts: usize,
}

impl PolicySnapshot {
    pub fn summary(&self) -> SnapshotSummary {
        SnapshotSummary {
            inbound_policies: self.inbound.len(),
            inbound_rules: self.inbound.iter().map(|p| p.rules.len()).sum(),
            outbound_policies: self.outbound.len(),
            outbound_routes: self.outbound.iter().map(|p| p.routes.len()).sum(),
            traffic_matches: self.traffic_matches.len(),
            egress_cluster_configs: self.egress_cluster_configs.len(),
            conflicts: self.conflicts.len(),
        }
    }

    pub fn inbound_policy(&self, name: &str) -> Option<&InboundTrafficPolicy> {
        self.inbound.iter().find(|p| p.name == name)
    }

    pub fn outbound_policy(&self, name: &str) -> Option<&OutboundTrafficPolicy> {
        self.outbound.iter().find(|p| p.name == name)
    }
}

/// Build a snapshot from `batches`, folded in order.
///
/// Route conflicts are recorded on the snapshot and do not fail the pass. A
/// dedup hash failure does, and no snapshot is produced.
pub fn build_snapshot<I>(batches: I, options: SnapshotOptions) -> Result<PolicySnapshot>
where
    I: IntoIterator<Item = DiscoveredPolicies>,
{
    let mut snapshot = PolicySnapshot::default();

    for batch in batches {
        debug!(
            source = %batch.source,
            inbound = batch.inbound.len(),
            ingress = batch.ingress.len(),
            outbound = batch.outbound.len(),
            "folding discovery batch"
        );

        let inbound = batch.inbound.iter().map(|spec| spec.build());
        snapshot.inbound = merge_inbound_policies(options.inbound, snapshot.inbound, inbound);

        let ingress = batch.ingress.iter().map(|spec| spec.build());
        snapshot.inbound = merge_inbound_policies(options.ingress, snapshot.inbound, ingress);

        let mut outbound = Vec::with_capacity(batch.outbound.len());
        for spec in &batch.outbound {
            let (policy, conflicts) = spec.build()?;
            snapshot.conflicts.extend(conflicts);
            outbound.push(policy);
        }
        snapshot.outbound = merge_outbound_policies(options.outbound, snapshot.outbound, outbound);

        snapshot.traffic_matches.extend(batch.traffic_matches);
        snapshot.egress_cluster_configs.extend(batch.egress_cluster_configs);
    }

    snapshot.traffic_matches = deduplicate_traffic_matches(std::mem::take(&mut snapshot.traffic_matches))?;
    snapshot.egress_cluster_configs =
        deduplicate_cluster_configs(std::mem::take(&mut snapshot.egress_cluster_configs))?;

    Ok(snapshot)
}
