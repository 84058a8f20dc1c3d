use applist_core::{AppId, AppRecord};
use jiff::Timestamp;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// The cache map, shared between the cache and its persistence worker.
pub(crate) type SharedEntries = Arc<Mutex<HashMap<AppId, CacheEntry>>>;

/// A cached record together with the moment it stops being fresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub record: AppRecord,
    pub expires_at: Timestamp,
}

impl CacheEntry {
    pub fn new(record: AppRecord, expires_at: Timestamp) -> Self {
        Self { record, expires_at }
    }

    /// An entry is fresh strictly before its expiry.
    pub fn is_fresh(&self, now: Timestamp) -> bool {
        now < self.expires_at
    }
}
