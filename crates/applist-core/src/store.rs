use crate::error::StoreError;
use crate::record::AppRecord;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Durable storage for a full cache snapshot.
#[async_trait]
pub trait SnapshotStore: Send + Sync + 'static {
    /// Loads the last saved snapshot.
    ///
    /// A store that has never been written returns an empty snapshot.
    async fn load(&self) -> Result<Vec<AppRecord>>;

    /// Replaces the stored snapshot with `records`.
    ///
    /// On failure the previous snapshot stays in place.
    async fn save(&self, records: &[AppRecord]) -> Result<()>;
}
