//! Outbound (weight-routed) policy bundles.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::route::{RetryPolicy, RouteMatch, RouteWeightedClusters, WeightedCluster, WeightedClusterSet};
use crate::error::Result;

/// Same route match registered twice with different backend sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConflict {
    /// Name of the outbound policy the route was added to.
    pub policy: String,
    pub route_match: RouteMatch,
    pub existing: WeightedClusterSet,
    pub requested: WeightedClusterSet,
}

impl fmt::Display for RouteConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "route for match `{}` already exists with clusters {} (requested {}) in outbound policy {}",
            self.route_match, self.existing, self.requested, self.policy
        )
    }
}

/// Named bundle of hostnames and the outbound routes that serve them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundTrafficPolicy {
    pub name: String,
    pub hostnames: Vec<String>,
    #[serde(default)]
    pub routes: Vec<RouteWeightedClusters>,
}

impl OutboundTrafficPolicy {
    pub fn new(name: impl Into<String>, hostnames: Vec<String>) -> Self {
        Self {
            name: name.into(),
            hostnames,
            routes: Vec::new(),
        }
    }

    /// Register a route.
    ///
    /// Routes are keyed by match alone. Re-adding a match with the same
    /// cluster set only replaces its retry policy; re-adding it with a
    /// different set is a `RouteConflict` and leaves the bundle untouched.
    pub fn add_route<I>(
        &mut self,
        route_match: RouteMatch,
        retry_policy: Option<RetryPolicy>,
        weighted_clusters: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = WeightedCluster>,
    {
        let requested: WeightedClusterSet = weighted_clusters.into_iter().collect();

        if let Some(existing) = self.routes.iter_mut().find(|r| r.route_match == route_match) {
            if existing.weighted_clusters == requested {
                existing.retry_policy = retry_policy;
                return Ok(());
            }
            return Err(RouteConflict {
                policy: self.name.clone(),
                route_match,
                existing: existing.weighted_clusters.clone(),
                requested,
            }
            .into());
        }

        self.routes.push(RouteWeightedClusters {
            route_match,
            weighted_clusters: requested,
            retry_policy,
        });
        Ok(())
    }

    /// Route registered for `route_match`, if any.
    pub fn route(&self, route_match: &RouteMatch) -> Option<&RouteWeightedClusters> {
        self.routes.iter().find(|r| &r.route_match == route_match)
    }
}
