//! meshpolicy controller library entry.
//!
//! This crate is the reconciliation driver around `meshpolicy-core`: it polls
//! discovery sources, runs one merge + dedup pass per tick, publishes the
//! result, and serves it over HTTP. It is intended to be consumed by the
//! binary (`main.rs`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod discovery;
pub mod obs;
pub mod ops;
pub mod reconcile;
pub mod router;
