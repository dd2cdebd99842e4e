use async_trait::async_trait;

use meshpolicy_core::error::Result;
use meshpolicy_core::DiscoveredPolicies;

/// Supplies discovered policy records. Implement for a cluster API watcher,
/// a file, or an in-memory feed.
#[async_trait]
pub trait DiscoverySource: Send + Sync {
    fn name(&self) -> &str;
    async fn discover(&self) -> Result<DiscoveredPolicies>;
}
