use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use meshpolicy_core::error::Result;
use meshpolicy_core::{build_snapshot, SnapshotOptions};

use super::store::{PublishedSnapshot, SnapshotStore};
use crate::discovery::DiscoverySource;
use crate::obs::ControllerMetrics;

/// Drives merge + dedup passes over a fixed set of discovery sources.
pub struct Reconciler {
    sources: Vec<Arc<dyn DiscoverySource>>,
    options: SnapshotOptions,
    store: Arc<SnapshotStore>,
    metrics: Arc<ControllerMetrics>,
}

impl Reconciler {
    pub fn new(
        sources: Vec<Arc<dyn DiscoverySource>>,
        options: SnapshotOptions,
        store: Arc<SnapshotStore>,
        metrics: Arc<ControllerMetrics>,
    ) -> Self {
        Self {
            sources,
            options,
            store,
            metrics,
        }
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Run one pass and publish its snapshot.
    ///
    /// On error nothing is published; the store keeps serving the previous
    /// snapshot and the caller may simply try again next tick.
    pub async fn reconcile_once(&self) -> Result<Arc<PublishedSnapshot>> {
        let started = Instant::now();
        let result = self.run_pass().await;
        self.metrics.reconcile_duration.observe(&[], started.elapsed());

        match &result {
            Ok(published) => {
                let summary = published.snapshot.summary();
                self.metrics.reconcile_passes.inc(&[("result", "ok")]);
                self.metrics.record_published(published.generation, &summary);
                tracing::info!(
                    generation = published.generation,
                    inbound = summary.inbound_policies,
                    outbound = summary.outbound_policies,
                    traffic_matches = summary.traffic_matches,
                    egress = summary.egress_cluster_configs,
                    conflicts = summary.conflicts,
                    elapsed_us = started.elapsed().as_micros() as u64,
                    "snapshot published"
                );
            }
            Err(e) => {
                self.metrics
                    .reconcile_passes
                    .inc(&[("result", "error"), ("code", e.code().as_str())]);
                tracing::error!(
                    code = e.code().as_str(),
                    error = %e,
                    kept_generation = self.store.generation(),
                    "reconcile pass failed; keeping last published snapshot"
                );
            }
        }
        result
    }

    async fn run_pass(&self) -> Result<Arc<PublishedSnapshot>> {
        let results = join_all(self.sources.iter().map(|s| s.discover())).await;

        let mut batches = Vec::with_capacity(results.len());
        let mut first_err = None;
        for (source, result) in self.sources.iter().zip(results) {
            match result {
                Ok(mut batch) => {
                    if batch.source.is_empty() {
                        batch.source = source.name().to_string();
                    }
                    batches.push(batch);
                }
                Err(e) => {
                    self.metrics.discovery_errors.inc(&[("source", source.name())]);
                    tracing::warn!(source = source.name(), error = %e, "discovery failed");
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
            }
        }
        // No partial snapshots: one missing source fails the whole pass.
        if let Some(e) = first_err {
            return Err(e);
        }

        let snapshot = build_snapshot(batches, self.options)?;
        for c in &snapshot.conflicts {
            self.metrics.route_conflicts.inc(&[("policy", c.policy.as_str())]);
        }
        Ok(self.store.publish(snapshot))
    }

    /// Reconcile every `period` until `shutdown` flips to `true` (or its
    /// sender is dropped). The first pass runs immediately.
    pub async fn run(self: Arc<Self>, period: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(sources = ?self.source_names(), period_ms = period.as_millis() as u64, "reconciler started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // Failures are logged and counted inside; the loop never stops on them.
                    let _ = self.reconcile_once().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("reconciler stopping");
                        break;
                    }
                }
            }
        }
    }
}
