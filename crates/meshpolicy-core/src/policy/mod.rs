//! Traffic-policy data model.
//!
//! - `route`: value types (route match, weighted clusters, retry policy).
//! - `inbound` / `outbound`: per-hostname policy bundles and their
//!   incremental add operations.
//! - `records`: content-identified records handled by the dedup engine.
//!
//! Every type here derives structural `Eq`; that derived equality is the only
//! notion of "same route" used by lookup and merge paths.

pub mod inbound;
pub mod outbound;
pub mod records;
pub mod route;

pub use inbound::{InboundTrafficPolicy, Rule};
pub use outbound::{OutboundTrafficPolicy, RouteConflict};
pub use records::{EgressClusterConfig, TrafficMatch};
pub use route::{
    PathMatchType, RetryPolicy, RouteMatch, RouteWeightedClusters, ServiceIdentity, WeightedCluster,
    WeightedClusterSet,
};
