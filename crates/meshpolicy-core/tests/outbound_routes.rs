//! Outbound route aggregation, route-set merge, and bundle merge.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use meshpolicy_core::error::ErrorCode;
use meshpolicy_core::{
    merge_outbound_policies, merge_routes_weighted_clusters, HostnameMatch, MeshPolicyError,
    OutboundTrafficPolicy, RetryPolicy, RouteMatch, RouteWeightedClusters, WeightedClusterSet,
};

mod common;
use common::{get, hosts, route, wc};

fn retry(on: &str) -> Option<RetryPolicy> {
    Some(RetryPolicy {
        retry_on: on.into(),
        per_try_timeout_ms: None,
        num_retries: Some(2),
        retry_backoff_base_interval_ms: None,
    })
}

#[test]
fn add_route_conflict_law() {
    let mut policy = OutboundTrafficPolicy::new("bookstore", hosts(&["bookstore.ns"]));
    let m = get("/books");

    policy.add_route(m.clone(), None, [wc("x", 100)]).unwrap();

    let err = policy.add_route(m.clone(), None, [wc("y", 100)]).expect_err("must conflict");
    assert_eq!(err.code(), ErrorCode::RouteConflict);
    assert_eq!(err.code().as_str(), "ROUTE_CONFLICT");
    match &err {
        MeshPolicyError::RouteConflict(c) => {
            assert_eq!(c.policy, "bookstore");
            assert_eq!(c.route_match, m);
            assert_eq!(c.existing, [wc("x", 100)].into_iter().collect::<WeightedClusterSet>());
            assert_eq!(c.requested, [wc("y", 100)].into_iter().collect::<WeightedClusterSet>());
        }
        other => panic!("unexpected error: {other}"),
    }
    let msg = err.to_string();
    assert!(msg.contains("bookstore"), "{msg}");
    assert!(msg.contains("/books"), "{msg}");

    // Same clusters, new retry policy: only the retry policy changes.
    policy.add_route(m.clone(), retry("5xx"), [wc("x", 100)]).unwrap();

    assert_eq!(policy.routes.len(), 1);
    let r = policy.route(&m).unwrap();
    assert_eq!(r.retry_policy, retry("5xx"));
    assert_eq!(r.weighted_clusters, [wc("x", 100)].into_iter().collect::<WeightedClusterSet>());
}

#[test]
fn add_route_retry_policy_last_write_wins() {
    let mut policy = OutboundTrafficPolicy::new("svc", hosts(&["svc.ns"]));
    let m = get("/");
    policy.add_route(m.clone(), retry("5xx"), [wc("a", 50), wc("b", 50)]).unwrap();
    policy.add_route(m.clone(), None, [wc("b", 50), wc("a", 50)]).unwrap();

    assert_eq!(policy.routes.len(), 1);
    assert_eq!(policy.routes[0].retry_policy, None);
}

#[test]
fn add_route_appends_distinct_matches() {
    let mut policy = OutboundTrafficPolicy::new("svc", hosts(&["svc.ns"]));
    policy.add_route(get("/a"), None, [wc("a", 100)]).unwrap();
    policy.add_route(get("/b"), None, [wc("b", 100)]).unwrap();
    policy.add_route(RouteMatch::wildcard(), None, [wc("c", 100)]).unwrap();

    assert_eq!(policy.routes.len(), 3);
    assert!(policy.routes[2].route_match.is_wildcard());
}

#[test]
fn method_order_does_not_change_the_match() {
    let mut policy = OutboundTrafficPolicy::new("svc", hosts(&["svc.ns"]));
    let a = RouteMatch::new("/", meshpolicy_core::PathMatchType::Exact, ["GET", "POST"]);
    let b = RouteMatch::new("/", meshpolicy_core::PathMatchType::Exact, ["POST", "GET"]);
    policy.add_route(a, None, [wc("a", 100)]).unwrap();

    assert!(policy.add_route(b, None, [wc("b", 100)]).is_err());
}

#[test]
fn weighted_clusters_collapse_duplicates_and_sum() {
    let r = RouteWeightedClusters::new(get("/"), [wc("a", 60), wc("b", 40), wc("a", 60)]);
    assert_eq!(r.weighted_clusters.len(), 2);
    assert_eq!(r.total_clusters_weight(), 100);

    let reordered = RouteWeightedClusters::new(get("/"), [wc("b", 40), wc("a", 60)]);
    assert_eq!(r, reordered);
}

#[test]
fn route_set_merge_unions_differing_clusters() {
    let original = vec![route("/a", &[("x", 100)]), route("/b", &[("x", 100)])];
    let latest = vec![route("/a", &[("y", 100)]), route("/c", &[("z", 100)])];

    let merged = merge_routes_weighted_clusters(original, latest);

    assert_eq!(merged.len(), 3);
    assert_eq!(merged[0], route("/a", &[("x", 100), ("y", 100)]));
    assert_eq!(merged[1], route("/b", &[("x", 100)]));
    assert_eq!(merged[2], route("/c", &[("z", 100)]));
}

#[test]
fn route_set_merge_keeps_equal_sets() {
    let original = vec![route("/a", &[("x", 100)])];
    let merged = merge_routes_weighted_clusters(original.clone(), original.clone());
    assert_eq!(merged, original);
}

#[test]
fn outbound_bundles_merge_by_hostname() {
    let mut a = OutboundTrafficPolicy::new("svc", hosts(&["svc.ns", "svc.ns.svc"]));
    a.add_route(get("/"), None, [wc("v1", 100)]).unwrap();
    let mut b = OutboundTrafficPolicy::new("svc-split", hosts(&["svc.ns", "svc.ns.svc"]));
    b.add_route(get("/"), None, [wc("v2", 100)]).unwrap();
    let other = OutboundTrafficPolicy::new("other", hosts(&["other.ns"]));

    let merged = merge_outbound_policies(HostnameMatch::Exact, vec![a], vec![b, other]);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].routes, vec![route("/", &[("v1", 100), ("v2", 100)])]);
    assert_eq!(merged[1].name, "other");
}

#[test]
fn header_difference_keeps_matches_apart() {
    let plain = get("/api");
    let canary = get("/api").with_header("x-canary", "true");
    assert_ne!(plain, canary);

    let mut policy = OutboundTrafficPolicy::new("svc", hosts(&["svc.ns"]));
    policy.add_route(plain.clone(), None, [wc("v1", 100)]).unwrap();
    policy.add_route(canary.clone(), None, [wc("v2", 100)]).unwrap();
    assert_eq!(policy.routes.len(), 2);
    assert_eq!(
        policy.route(&canary).unwrap().weighted_clusters,
        [wc("v2", 100)].into_iter().collect::<WeightedClusterSet>()
    );

    let merged = merge_routes_weighted_clusters(
        vec![RouteWeightedClusters::new(plain.clone(), [wc("v1", 100)])],
        vec![RouteWeightedClusters::new(canary.clone(), [wc("v2", 100)])],
    );
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].route_match, plain);
    assert_eq!(merged[1].route_match, canary);
}

#[test]
fn outbound_bundles_merge_by_hostname_subset() {
    let mut a = OutboundTrafficPolicy::new("svc", hosts(&["svc.ns.svc", "svc.ns"]));
    a.add_route(get("/"), None, [wc("v1", 100)]).unwrap();
    let mut b = OutboundTrafficPolicy::new("svc-split", hosts(&["svc.ns", "svc.ns.svc", "svc"]));
    b.add_route(get("/"), None, [wc("v2", 100)]).unwrap();
    b.add_route(get("/admin"), None, [wc("admin", 100)]).unwrap();
    let other = OutboundTrafficPolicy::new("other", hosts(&["other.ns"]));

    let merged = merge_outbound_policies(HostnameMatch::Partial, vec![a], vec![b, other]);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].name, "svc");
    assert_eq!(merged[0].hostnames, hosts(&["svc", "svc.ns", "svc.ns.svc"]));
    assert_eq!(
        merged[0].routes,
        vec![route("/", &[("v1", 100), ("v2", 100)]), route("/admin", &[("admin", 100)])]
    );
    assert_eq!(merged[1].name, "other");
}
