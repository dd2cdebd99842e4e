//! Hostname matching helpers.

use std::collections::BTreeSet;

use super::HostnameMatch;

/// Sorted union of both hostname lists, if one is a subset of the other.
///
/// `None` means the lists are unrelated and must not be merged. Two empty
/// lists are also `None`: an empty union never identifies a bundle.
pub fn union_if_subset(first: &[String], second: &[String]) -> Option<Vec<String>> {
    let first: BTreeSet<&String> = first.iter().collect();
    let second: BTreeSet<&String> = second.iter().collect();

    if !(first.is_subset(&second) || second.is_subset(&first)) {
        return None;
    }

    let union: Vec<String> = first.union(&second).map(|h| (*h).clone()).collect();
    if union.is_empty() {
        None
    } else {
        Some(union)
    }
}

/// Hostnames the original bundle should carry after absorbing `latest`, or
/// `None` if the two bundles do not match under `mode`.
pub(crate) fn match_hostnames(
    mode: HostnameMatch,
    original: &[String],
    latest: &[String],
) -> Option<Vec<String>> {
    match mode {
        HostnameMatch::Exact => (original == latest).then(|| original.to_vec()),
        HostnameMatch::Partial => union_if_subset(original, latest),
    }
}

/// Index of the first original bundle matching `latest` and the hostnames it
/// takes on. First match wins even when several originals would qualify.
pub(crate) fn find_first_match<'a, I>(
    mode: HostnameMatch,
    originals: I,
    latest: &[String],
) -> Option<(usize, Vec<String>)>
where
    I: IntoIterator<Item = &'a [String]>,
{
    originals
        .into_iter()
        .enumerate()
        .find_map(|(idx, hostnames)| match_hostnames(mode, hostnames, latest).map(|h| (idx, h)))
}
