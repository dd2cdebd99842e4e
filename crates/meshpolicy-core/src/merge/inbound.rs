//! Inbound bundle and rule merging.

use tracing::debug;

use super::hostnames::find_first_match;
use super::HostnameMatch;
use crate::policy::{InboundTrafficPolicy, Rule};

/// Fold `latest` bundles into `original`.
///
/// Each latest bundle merges its rules into the first original bundle whose
/// hostnames match under `mode` (in partial mode that bundle's hostnames
/// become the sorted union of both). Unmatched bundles are appended.
pub fn merge_inbound_policies<I>(
    mode: HostnameMatch,
    mut original: Vec<InboundTrafficPolicy>,
    latest: I,
) -> Vec<InboundTrafficPolicy>
where
    I: IntoIterator<Item = InboundTrafficPolicy>,
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
                    "merging inbound policy"
                );
                o.hostnames = hostnames;
                let rules = std::mem::take(&mut o.rules);
                o.rules = merge_rules(rules, l.rules);
            }
            None => original.push(l),
        }
    }
    original
}

/// Merge rule lists so there is one rule per route, carrying the union of
/// all identities allowed on it.
pub fn merge_rules<I>(mut original: Vec<Rule>, latest: I) -> Vec<Rule>
where
    I: IntoIterator<Item = Rule>,
{
    for l in latest {
        match original.iter_mut().find(|o| o.route == l.route) {
            Some(o) => o.allowed_service_identities.extend(l.allowed_service_identities),
            None => original.push(l),
        }
    }
    original
}
