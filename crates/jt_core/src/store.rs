use async_trait::async_trait;

use crate::Result;

/// Persistent set of already-processed article links.
///
/// Backends load their state once when opened and persist it when `flush`
/// is called, once at the end of a run. Nothing else writes to the backing
/// file, so no locking is needed beyond interior mutability.
#[async_trait]
pub trait SeenStore: Send + Sync {
    /// Whether the link was already processed.
    async fn contains(&self, link: &str) -> Result<bool>;

    /// Record a link as processed.
    async fn insert(&self, link: &str) -> Result<()>;

    /// Number of recorded links.
    async fn len(&self) -> Result<usize>;

    /// Persist the set, for backends with a durable copy.
    async fn flush(&self) -> Result<()>;
}
