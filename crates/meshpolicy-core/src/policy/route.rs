//! Route-level value types.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Regex matching every path.
pub const REGEX_MATCH_ALL: &str = ".*";

/// Method wildcard.
pub const WILDCARD_HTTP_METHOD: &str = "*";

/// How `RouteMatch::path` is compared against a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathMatchType {
    Exact,
    Prefix,
    Regex,
}

impl PathMatchType {
    pub fn as_str(self) -> &'static str {
        match self {
            PathMatchType::Exact => "exact",
            PathMatchType::Prefix => "prefix",
            PathMatchType::Regex => "regex",
        }
    }
}

/// Condition describing which requests a route applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteMatch {
    pub path: String,
    #[serde(default = "default_path_match_type")]
    pub path_match_type: PathMatchType,
    /// Allowed methods. A set, so `[GET, POST]` and `[POST, GET]` are the same match.
    #[serde(default)]
    pub methods: BTreeSet<String>,
    /// Required request headers (name -> value).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

fn default_path_match_type() -> PathMatchType {
    PathMatchType::Prefix
}

impl RouteMatch {
    pub fn new<I, S>(path: impl Into<String>, path_match_type: PathMatchType, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into(),
            path_match_type,
            methods: methods.into_iter().map(Into::into).collect(),
            headers: BTreeMap::new(),
        }
    }

    /// The match-everything route: regex `.*`, any method.
    pub fn wildcard() -> Self {
        Self::new(REGEX_MATCH_ALL, PathMatchType::Regex, [WILDCARD_HTTP_METHOD])
    }

    pub fn is_wildcard(&self) -> bool {
        *self == Self::wildcard()
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

impl fmt::Display for RouteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path_match_type.as_str(), self.path)?;
        if !self.methods.is_empty() {
            let methods: Vec<&str> = self.methods.iter().map(String::as_str).collect();
            write!(f, " [{}]", methods.join(","))?;
        }
        for (name, value) in &self.headers {
            write!(f, " {name}={value}")?;
        }
        Ok(())
    }
}

/// A backend cluster with a relative traffic-splitting weight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightedCluster {
    pub cluster_name: String,
    pub weight: u32,
}

impl WeightedCluster {
    pub fn new(cluster_name: impl Into<String>, weight: u32) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            weight,
        }
    }
}

impl fmt::Display for WeightedCluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.cluster_name, self.weight)
    }
}

/// Set of weighted clusters, unique by value.
///
/// Backed by a `BTreeSet` so iteration is canonical and never reflects the
/// order in which clusters were discovered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightedClusterSet(BTreeSet<WeightedCluster>);

impl WeightedClusterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, cluster: WeightedCluster) -> bool {
        self.0.insert(cluster)
    }

    /// In-place union.
    pub fn union_with(&mut self, other: &WeightedClusterSet) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn contains(&self, cluster: &WeightedCluster) -> bool {
        self.0.contains(cluster)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeightedCluster> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all weights in the set.
    pub fn total_weight(&self) -> u64 {
        self.0.iter().map(|c| u64::from(c.weight)).sum()
    }
}

impl FromIterator<WeightedCluster> for WeightedClusterSet {
    fn from_iter<I: IntoIterator<Item = WeightedCluster>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for WeightedClusterSet {
    type Item = WeightedCluster;
    type IntoIter = std::collections::btree_set::IntoIter<WeightedCluster>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for WeightedClusterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Retry behavior attached to a route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryPolicy {
    /// Envoy-style retry condition list, e.g. `5xx,reset`.
    pub retry_on: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_try_timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_backoff_base_interval_ms: Option<u64>,
}

/// Caller identity, `<service-account>.<namespace>.<trust-domain>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceIdentity(String);

impl ServiceIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ServiceIdentity {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ServiceIdentity {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ServiceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A route match with the clusters it splits traffic across.
///
/// Unit of outbound routing, and of inbound rule matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteWeightedClusters {
    pub route_match: RouteMatch,
    pub weighted_clusters: WeightedClusterSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_policy: Option<RetryPolicy>,
}

impl RouteWeightedClusters {
    /// Build from a match and a cluster list; duplicate clusters collapse.
    pub fn new<I>(route_match: RouteMatch, weighted_clusters: I) -> Self
    where
        I: IntoIterator<Item = WeightedCluster>,
    {
        Self {
            route_match,
            weighted_clusters: weighted_clusters.into_iter().collect(),
            retry_policy: None,
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: Option<RetryPolicy>) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Total weight of the weighted clusters.
    pub fn total_clusters_weight(&self) -> u64 {
        self.weighted_clusters.total_weight()
    }
}
