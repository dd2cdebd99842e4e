//! Discovery input records and the builders that turn them into bundles.
//!
//! A discovery source emits one `DiscoveredPolicies` batch per reconciliation
//! pass. The records mirror what upstream translation produces: policies are
//! already parsed and typed, and nothing here validates them further.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{MeshPolicyError, Result};
use crate::policy::{
    EgressClusterConfig, InboundTrafficPolicy, OutboundTrafficPolicy, RetryPolicy, RouteConflict,
    RouteMatch, RouteWeightedClusters, ServiceIdentity, TrafficMatch, WeightedCluster,
};

/// A route as discovered: match, clusters, and optional retry policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteSpec {
    #[serde(rename = "match")]
    pub route_match: RouteMatch,
    pub weighted_clusters: Vec<WeightedCluster>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_policy: Option<RetryPolicy>,
}

impl RouteSpec {
    pub fn to_route(&self) -> RouteWeightedClusters {
        RouteWeightedClusters::new(self.route_match.clone(), self.weighted_clusters.iter().cloned())
            .with_retry_policy(self.retry_policy.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InboundRuleSpec {
    pub route: RouteSpec,
    #[serde(default)]
    pub allowed_identities: Vec<ServiceIdentity>,
}

/// Inbound policy as discovered for one workload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InboundPolicySpec {
    pub name: String,
    pub hostnames: Vec<String>,
    #[serde(default)]
    pub rules: Vec<InboundRuleSpec>,
}

impl InboundPolicySpec {
    /// Build the bundle, one `add_rule` per (route, identity) fact.
    ///
    /// A rule that allows no identity grants nothing and is skipped.
    pub fn build(&self) -> InboundTrafficPolicy {
        let mut policy = InboundTrafficPolicy::new(self.name.clone(), self.hostnames.clone());
        for rule in &self.rules {
            if rule.allowed_identities.is_empty() {
                warn!(
                    policy = %self.name,
                    route = %rule.route.route_match,
                    "skipping inbound rule without allowed identities"
                );
                continue;
            }
            let route = rule.route.to_route();
            for identity in &rule.allowed_identities {
                policy.add_rule(route.clone(), identity.clone());
            }
        }
        policy
    }
}

/// Outbound policy as discovered for one upstream service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutboundPolicySpec {
    pub name: String,
    pub hostnames: Vec<String>,
    #[serde(default)]
    pub routes: Vec<RouteSpec>,
}

impl OutboundPolicySpec {
    /// Build the bundle via `add_route`.
    ///
    /// A conflicting route is dropped (the first registration stays) and
    /// returned so the caller can surface it. Any other failure aborts.
    pub fn build(&self) -> Result<(OutboundTrafficPolicy, Vec<RouteConflict>)> {
        let mut policy = OutboundTrafficPolicy::new(self.name.clone(), self.hostnames.clone());
        let mut conflicts = Vec::new();
        for route in &self.routes {
            let added = policy.add_route(
                route.route_match.clone(),
                route.retry_policy.clone(),
                route.weighted_clusters.iter().cloned(),
            );
            match added {
                Ok(()) => {}
                Err(MeshPolicyError::RouteConflict(conflict)) => {
                    warn!(
                        policy = %conflict.policy,
                        route = %conflict.route_match,
                        existing = %conflict.existing,
                        requested = %conflict.requested,
                        "dropping conflicting outbound route"
                    );
                    conflicts.push(conflict);
                }
                Err(other) => return Err(other),
            }
        }
        Ok((policy, conflicts))
    }
}

/// Everything one discovery source reported for a single pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveredPolicies {
    /// Source name, for diagnostics.
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub inbound: Vec<InboundPolicySpec>,
    /// Inbound policies of ingress origin. Their hostname lists are often
    /// partial, so they are merged with the ingress hostname mode.
    #[serde(default)]
    pub ingress: Vec<InboundPolicySpec>,
    #[serde(default)]
    pub outbound: Vec<OutboundPolicySpec>,
    #[serde(default)]
    pub traffic_matches: Vec<TrafficMatch>,
    #[serde(default)]
    pub egress_cluster_configs: Vec<EgressClusterConfig>,
}
