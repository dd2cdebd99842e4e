//! Reconciliation: run passes, publish snapshots.
//!
//! One `Reconciler` task owns the loop, so at most one pass is ever in
//! flight. A failed pass publishes nothing and the last known-good snapshot
//! keeps being served.

pub mod reconciler;
pub mod store;

pub use reconciler::Reconciler;
pub use store::{PublishedSnapshot, SnapshotStore};
