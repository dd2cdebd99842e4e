//! Inbound (access-controlled) policy bundles.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::route::{RouteWeightedClusters, ServiceIdentity};

/// A route plus the caller identities allowed to use it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub route: RouteWeightedClusters,
    pub allowed_service_identities: BTreeSet<ServiceIdentity>,
}

impl Rule {
    pub fn new(route: RouteWeightedClusters, identity: ServiceIdentity) -> Self {
        Self {
            route,
            allowed_service_identities: BTreeSet::from([identity]),
        }
    }

    pub fn allows(&self, identity: &ServiceIdentity) -> bool {
        self.allowed_service_identities.contains(identity)
    }
}

/// Named bundle of hostnames and the inbound rules that apply to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundTrafficPolicy {
    pub name: String,
    pub hostnames: Vec<String>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl InboundTrafficPolicy {
    pub fn new(name: impl Into<String>, hostnames: Vec<String>) -> Self {
        Self {
            name: name.into(),
            hostnames,
            rules: Vec::new(),
        }
    }

    /// Grant `identity` access to `route`.
    ///
    /// A rule whose route is structurally equal (match, clusters, retry
    /// policy) absorbs the identity; otherwise a new rule is appended. Routes
    /// that merely share a path stay separate rules.
    pub fn add_rule(&mut self, route: RouteWeightedClusters, identity: ServiceIdentity) {
        if let Some(rule) = self.rules.iter_mut().find(|r| r.route == route) {
            rule.allowed_service_identities.insert(identity);
            return;
        }
        tracing::trace!(policy = %self.name, route = %route.route_match, "new inbound rule");
        self.rules.push(Rule::new(route, identity));
    }
}
