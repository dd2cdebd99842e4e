//! Structural deduplication by canonical content hash.
//!
//! Records are serialized through serde into a `serde_json::Value` tree and
//! digested with SHA-256:
//! - object keys are visited in sorted order,
//! - every array is digested as a sorted multiset of its element digests, so
//!   reordering a sequence field never yields a new identity,
//! - the first 8 bytes of the root digest form the `u64` map key.
//!
//! Equal keys are treated as equal records. With a 64-bit key the odds of two
//! distinct records colliding within one snapshot are negligible, and that
//! approximation is accepted here.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{MeshPolicyError, Result};
use crate::policy::{EgressClusterConfig, TrafficMatch};

type NodeDigest = [u8; 32];

// Type tags keep e.g. the string "1" and the number 1 apart.
const TAG_NULL: u8 = 0;
const TAG_BOOL: u8 = 1;
const TAG_NUMBER: u8 = 2;
const TAG_STRING: u8 = 3;
const TAG_ARRAY: u8 = 4;
const TAG_OBJECT: u8 = 5;

/// Canonical, order-insensitive content hash of `record`.
///
/// Fails only if `record` cannot be represented as a serde data tree (for
/// example a map keyed by a composite type).
pub fn content_hash<T: Serialize + ?Sized>(record: &T) -> Result<u64> {
    let value = serde_json::to_value(record).map_err(|e| MeshPolicyError::Hash(e.to_string()))?;
    let digest = node_digest(&value);
    let mut key = [0u8; 8];
    key.copy_from_slice(&digest[..8]);
    Ok(u64::from_be_bytes(key))
}

fn node_digest(value: &Value) -> NodeDigest {
    let mut hasher = Sha256::new();
    match value {
        Value::Null => hasher.update([TAG_NULL]),
        Value::Bool(b) => hasher.update([TAG_BOOL, u8::from(*b)]),
        Value::Number(n) => {
            hasher.update([TAG_NUMBER]);
            update_str(&mut hasher, &n.to_string());
        }
        Value::String(s) => {
            hasher.update([TAG_STRING]);
            update_str(&mut hasher, s);
        }
        Value::Array(items) => {
            let mut digests: Vec<NodeDigest> = items.iter().map(node_digest).collect();
            digests.sort_unstable();
            hasher.update([TAG_ARRAY]);
            hasher.update((digests.len() as u64).to_be_bytes());
            for d in &digests {
                hasher.update(d);
            }
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            hasher.update([TAG_OBJECT]);
            hasher.update((entries.len() as u64).to_be_bytes());
            for (k, v) in entries {
                update_str(&mut hasher, k);
                hasher.update(node_digest(v));
            }
        }
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

// Length-prefixed so adjacent strings cannot run together.
fn update_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_be_bytes());
    hasher.update(s.as_bytes());
}

/// Collapse content-identical records to one representative each.
///
/// On a hash collision the later record wins. Output is ordered by hash:
/// deterministic, but unrelated to input order. Any hash failure aborts the
/// whole call with no partial output.
pub fn deduplicate<T: Serialize>(records: Vec<T>) -> Result<Vec<T>> {
    let total = records.len();
    let mut by_hash: BTreeMap<u64, T> = BTreeMap::new();
    for record in records {
        let hash = content_hash(&record)?;
        by_hash.insert(hash, record);
    }
    debug!(total, unique = by_hash.len(), "deduplicated records");
    Ok(by_hash.into_values().collect())
}

/// Deduplicate traffic matches; sequence field order does not affect identity.
pub fn deduplicate_traffic_matches(matches: Vec<TrafficMatch>) -> Result<Vec<TrafficMatch>> {
    deduplicate(matches)
}

/// Deduplicate egress cluster configs.
pub fn deduplicate_cluster_configs(configs: Vec<EgressClusterConfig>) -> Result<Vec<EgressClusterConfig>> {
    deduplicate(configs)
}
