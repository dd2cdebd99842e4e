//! Outbound route-set and bundle merging.

use tracing::debug;

use super::hostnames::find_first_match;
use super::HostnameMatch;
use crate::policy::{OutboundTrafficPolicy, RouteWeightedClusters};

/// Merge two computed route sets so there is one route per match.
///
/// Where both sets route the same match to different clusters, the clusters
/// are unioned. Unlike `OutboundTrafficPolicy::add_route` this never fails:
/// two finished route sets are consolidated, not validated.
pub fn merge_routes_weighted_clusters<I>(
    mut original: Vec<RouteWeightedClusters>,
    latest: I,
) -> Vec<RouteWeightedClusters>
where
    I: IntoIterator<Item = RouteWeightedClusters>,
{
    for l in latest {
        match original.iter_mut().find(|o| o.route_match == l.route_match) {
            Some(o) => {
                if o.weighted_clusters != l.weighted_clusters {
                    debug!(route = %o.route_match, "unioning weighted clusters");
                    o.weighted_clusters.union_with(&l.weighted_clusters);
                }
            }
            None => original.push(l),
        }
    }
    original
}

/// Fold `latest` outbound bundles into `original`, matching bundles by
/// hostname under `mode` and consolidating their routes with
/// `merge_routes_weighted_clusters`.
pub fn merge_outbound_policies<I>(
    mode: HostnameMatch,
    mut original: Vec<OutboundTrafficPolicy>,
    latest: I,
) -> Vec<OutboundTrafficPolicy>
where
    I: IntoIterator<Item = OutboundTrafficPolicy>,
{
    for l in latest {
        let found = find_first_match(mode, original.iter().map(|o| o.hostnames.as_slice()), &l.hostnames);
        match found {
            Some((idx, hostnames)) => {
                let o = &mut original[idx];
                debug!(
                    original = %o.name,
                    latest = %l.name,
                    mode = mode.as_str(),
                    "merging outbound policy"
                );
                o.hostnames = hostnames;
                let routes = std::mem::take(&mut o.routes);
                o.routes = merge_routes_weighted_clusters(routes, l.routes);
            }
            None => original.push(l),
        }
    }
    original
}
