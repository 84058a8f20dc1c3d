use applist_core::{AppId, AppRecord, CacheError};
use async_trait::async_trait;

#[async_trait]
pub trait Resolver: Clone + Send + Sync + 'static {
    /// Resolves one identifier to its record.
    async fn resolve(&self, id: AppId) -> Result<AppRecord, CacheError>;
}
