//! Inbound rule aggregation and bundle merge.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::BTreeSet;

use meshpolicy_core::{
    merge_inbound_policies, merge_rules, HostnameMatch, InboundTrafficPolicy, RetryPolicy,
};

mod common;
use common::{hosts, id, route, rule};

#[test]
fn add_rule_accumulates_identities_for_same_route() {
    let mut svc_a = InboundTrafficPolicy::new("svc-a", hosts(&["svc-a.ns"]));
    let foo = route("/foo", &[("ns/svc-a", 100)]);

    svc_a.add_rule(foo.clone(), id("x.ns.cluster.local"));
    svc_a.add_rule(foo.clone(), id("y.ns.cluster.local"));
    svc_a.add_rule(foo.clone(), id("x.ns.cluster.local"));

    assert_eq!(svc_a.rules.len(), 1);
    let expected: BTreeSet<_> = [id("x.ns.cluster.local"), id("y.ns.cluster.local")].into();
    assert_eq!(svc_a.rules[0].route, foo);
    assert_eq!(svc_a.rules[0].allowed_service_identities, expected);
}

#[test]
fn add_rule_keeps_routes_with_same_path_apart() {
    let mut policy = InboundTrafficPolicy::new("svc-a", hosts(&["svc-a.ns"]));
    let plain = route("/foo", &[("ns/svc-a", 100)]);
    let reweighted = route("/foo", &[("ns/svc-a", 50)]);
    let with_retry = plain.clone().with_retry_policy(Some(RetryPolicy {
        retry_on: "5xx".into(),
        per_try_timeout_ms: Some(1000),
        num_retries: Some(3),
        retry_backoff_base_interval_ms: None,
    }));

    policy.add_rule(plain, id("x"));
    policy.add_rule(reweighted, id("x"));
    policy.add_rule(with_retry, id("y"));

    assert_eq!(policy.rules.len(), 3);
    assert!(policy.rules.iter().all(|r| r.allowed_service_identities.len() == 1));
}

#[test]
fn merge_rules_unions_identities() {
    let foo = route("/foo", &[("c1", 100)]);
    let bar = route("/bar", &[("c1", 100)]);

    let original = vec![rule(foo.clone(), &["a"])];
    let latest = vec![rule(foo.clone(), &["b"]), rule(bar.clone(), &["c"])];
    let merged = merge_rules(original, latest.clone());

    assert_eq!(merged, vec![rule(foo, &["a", "b"]), rule(bar, &["c"])]);

    // Second application of the same batch changes nothing.
    let again = merge_rules(merged.clone(), latest);
    assert_eq!(again, merged);
}

#[test]
fn exact_mode_merges_identical_hostnames() {
    let mut original = InboundTrafficPolicy::new("svc", hosts(&["a.com", "b.com"]));
    original.add_rule(route("/", &[("c1", 100)]), id("x"));
    let mut latest = InboundTrafficPolicy::new("svc-2", hosts(&["a.com", "b.com"]));
    latest.add_rule(route("/", &[("c1", 100)]), id("y"));

    let merged = merge_inbound_policies(HostnameMatch::Exact, vec![original], vec![latest]);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].name, "svc");
    assert_eq!(merged[0].rules, vec![rule(route("/", &[("c1", 100)]), &["x", "y"])]);
}

#[test]
fn exact_mode_never_merges_subsets() {
    let original = InboundTrafficPolicy::new("a", hosts(&["a.com"]));
    let latest = InboundTrafficPolicy::new("ab", hosts(&["a.com", "b.com"]));

    let merged = merge_inbound_policies(HostnameMatch::Exact, vec![original.clone()], vec![latest.clone()]);

    assert_eq!(merged, vec![original, latest]);
}

#[test]
fn partial_mode_merges_subset_into_existing_bundle() {
    let mut original = InboundTrafficPolicy::new("svc", hosts(&["b.com", "a.com"]));
    original.add_rule(route("/", &[("c1", 100)]), id("x"));
    let mut latest = InboundTrafficPolicy::new("host-header", hosts(&["a.com"]));
    latest.add_rule(route("/", &[("c1", 100)]), id("y"));
    latest.add_rule(route("/admin", &[("c1", 100)]), id("z"));

    let merged = merge_inbound_policies(HostnameMatch::Partial, vec![original], vec![latest]);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].hostnames, hosts(&["a.com", "b.com"]));
    assert_eq!(
        merged[0].rules,
        vec![
            rule(route("/", &[("c1", 100)]), &["x", "y"]),
            rule(route("/admin", &[("c1", 100)]), &["z"]),
        ]
    );
}

#[test]
fn partial_mode_grows_hostnames_when_latest_is_superset() {
    let original = InboundTrafficPolicy::new("svc", hosts(&["c.com"]));
    let latest = InboundTrafficPolicy::new("ingress", hosts(&["c.com", "a.com", "c.com"]));

    let merged = merge_inbound_policies(HostnameMatch::Partial, vec![original], vec![latest]);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].hostnames, hosts(&["a.com", "c.com"]));
}

#[test]
fn partial_mode_appends_unrelated_hostnames() {
    let original = InboundTrafficPolicy::new("ab", hosts(&["a.com", "b.com"]));
    let latest = InboundTrafficPolicy::new("bc", hosts(&["b.com", "c.com"]));

    let merged = merge_inbound_policies(HostnameMatch::Partial, vec![original], vec![latest]);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[1].name, "bc");
}

#[test]
fn partial_mode_uses_first_matching_bundle_only() {
    let first = InboundTrafficPolicy::new("first", hosts(&["a.com", "b.com"]));
    let second = InboundTrafficPolicy::new("second", hosts(&["a.com", "c.com"]));
    let mut latest = InboundTrafficPolicy::new("latest", hosts(&["a.com"]));
    latest.add_rule(route("/", &[("c1", 100)]), id("x"));

    let merged = merge_inbound_policies(HostnameMatch::Partial, vec![first, second.clone()], vec![latest]);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].rules.len(), 1);
    assert_eq!(merged[1], second);
}

#[test]
fn empty_hostnames_never_match_in_partial_mode() {
    let original = InboundTrafficPolicy::new("none-1", Vec::new());
    let latest = InboundTrafficPolicy::new("none-2", Vec::new());

    let merged = merge_inbound_policies(HostnameMatch::Partial, vec![original], vec![latest]);

    assert_eq!(merged.len(), 2);
}

#[test]
fn partial_merge_of_same_batch_twice_is_stable() {
    let mut original = InboundTrafficPolicy::new("svc", hosts(&["a.com", "b.com"]));
    original.add_rule(route("/", &[("c1", 100)]), id("x"));
    let mut latest = InboundTrafficPolicy::new("host-header", hosts(&["a.com"]));
    latest.add_rule(route("/", &[("c1", 100)]), id("y"));

    let once = merge_inbound_policies(HostnameMatch::Partial, vec![original], vec![latest.clone()]);
    let twice = merge_inbound_policies(HostnameMatch::Partial, once.clone(), vec![latest]);

    assert_eq!(once, twice);
}
