//! meshpolicy core: traffic-policy model, merge engine, and structural dedup.
//!
//! This crate turns independently discovered inbound/outbound policy bundles
//! into one consolidated snapshot. Everything here is a pure in-memory
//! transform: no I/O, no clocks, no shared state, so the same input always
//! yields the same snapshot and a pass can be re-run every reconciliation tick.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `MeshPolicyError`/`Result` so a bad policy
//! record can never take down the reconciliation loop.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod builder;
pub mod dedup;
pub mod error;
pub mod merge;
pub mod policy;
pub mod snapshot;

/// Shared result type.
pub use error::{MeshPolicyError, Result};

pub use builder::{DiscoveredPolicies, InboundPolicySpec, InboundRuleSpec, OutboundPolicySpec, RouteSpec};
pub use dedup::{content_hash, deduplicate, deduplicate_cluster_configs, deduplicate_traffic_matches};
pub use merge::{
    merge_inbound_policies, merge_outbound_policies, merge_routes_weighted_clusters, merge_rules,
    union_if_subset, HostnameMatch,
};
pub use policy::{
    EgressClusterConfig, InboundTrafficPolicy, OutboundTrafficPolicy, PathMatchType, RetryPolicy,
    RouteConflict, RouteMatch, RouteWeightedClusters, Rule, ServiceIdentity, TrafficMatch,
    WeightedCluster, WeightedClusterSet,
};
pub use snapshot::{build_snapshot, PolicySnapshot, SnapshotOptions, SnapshotSummary};
