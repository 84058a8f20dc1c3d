use applist_core::{AppRecord, SnapshotStore, StoreError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, StoreError>;

/// An in-memory [`SnapshotStore`].
///
/// Useful for sessions that should not touch the user's cache directory.
/// Clones share the same snapshot.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    snapshot: Arc<Mutex<Vec<AppRecord>>>,
    saves: Arc<AtomicUsize>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `records`.
    pub fn with_records(records: Vec<AppRecord>) -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(records)),
            saves: Arc::default(),
        }
    }

    /// Returns a copy of the current snapshot.
    pub fn records(&self) -> Vec<AppRecord> {
        self.snapshot.lock().clone()
    }

    /// Number of completed saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self) -> Result<Vec<AppRecord>> {
        Ok(self.records())
    }

    async fn save(&self, records: &[AppRecord]) -> Result<()> {
        *self.snapshot.lock() = records.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
