//! Lightweight in-process metrics.
//!
//! Counters, gauges, and a pass-duration histogram stored as atomics and
//! rendered in Prometheus text format by the `/metrics` handler.

pub mod metrics;

pub use metrics::ControllerMetrics;
