//! Merge engine.
//!
//! Folds incrementally discovered bundles into a cumulative snapshot. All
//! functions take the accumulated `original` by value and hand it back, so a
//! pass owns its snapshot outright and no bundle is ever aliased between
//! passes.
//!
//! - `inbound`: bundle-level merge and rule merge (identity union).
//! - `outbound`: route-set merge (cluster union) and bundle-level merge.
//! - `hostnames`: hostname matching shared by both.

pub mod hostnames;
pub mod inbound;
pub mod outbound;

use serde::{Deserialize, Serialize};

pub use hostnames::union_if_subset;
pub use inbound::{merge_inbound_policies, merge_rules};
pub use outbound::{merge_outbound_policies, merge_routes_weighted_clusters};

/// How a latest bundle finds the original bundle it folds into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostnameMatch {
    /// Hostname sequences must be identical, order included.
    #[default]
    Exact,
    /// One hostname set must contain the other; the bundle then takes the
    /// sorted union. Used for single-host (host header) and ingress policies.
    Partial,
}

impl HostnameMatch {
    pub fn as_str(self) -> &'static str {
        match self {
            HostnameMatch::Exact => "exact",
            HostnameMatch::Partial => "partial",
        }
    }
}
