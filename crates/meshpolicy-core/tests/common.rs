//! Fixture builders shared by the core integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use meshpolicy_core::{
    PathMatchType, RouteMatch, RouteWeightedClusters, Rule, ServiceIdentity, WeightedCluster,
};

pub fn hosts(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

pub fn get(path: &str) -> RouteMatch {
    RouteMatch::new(path, PathMatchType::Prefix, ["GET"])
}

pub fn wc(name: &str, weight: u32) -> WeightedCluster {
    WeightedCluster::new(name, weight)
}

pub fn route(path: &str, clusters: &[(&str, u32)]) -> RouteWeightedClusters {
    RouteWeightedClusters::new(get(path), clusters.iter().map(|(n, w)| wc(n, *w)))
}

pub fn id(s: &str) -> ServiceIdentity {
    ServiceIdentity::from(s)
}

pub fn rule(route: RouteWeightedClusters, identities: &[&str]) -> Rule {
    Rule {
        route,
        allowed_service_identities: identities.iter().map(|s| id(s)).collect(),
    }
}
