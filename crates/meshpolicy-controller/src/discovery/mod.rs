//! Discovery sources.
//!
//! A source hands the reconciler one `DiscoveredPolicies` batch per pass.
//! Sources are polled concurrently; the merge itself runs afterwards on the
//! reconciler task.

pub mod file;
pub mod memory;
pub mod source;

pub use file::FileSource;
pub use memory::MemorySource;
pub use source::DiscoverySource;
