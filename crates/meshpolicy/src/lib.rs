//! Top-level facade crate for meshpolicy.
//!
//! Re-exports the merge/dedup core and the reconciliation controller so users can depend on a single crate.

pub mod core {
    pub use meshpolicy_core::*;
}

pub mod controller {
    pub use meshpolicy_controller::*;
}
