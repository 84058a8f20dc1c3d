use crate::config::CacheConfig;
use crate::entry::{CacheEntry, SharedEntries};
use crate::persist::{self, Persister};
use crate::resolver::Resolver;
use applist_core::{
    AppId, AppRecord, CacheError, Catalog, CatalogError, Clock, SnapshotStore, SystemClock,
};
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use jiff::{SignedDuration, Timestamp};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, trace, warn};

/// Type alias for cache results.
pub type Result<T> = std::result::Result<T, CacheError>;

type InflightLookup = Shared<BoxFuture<'static, std::result::Result<AppRecord, CatalogError>>>;

/// An in-memory metadata cache backed by a snapshot store and a remote catalog.
///
/// # Resolution Strategy
///
/// - **Fresh hit**: an entry whose expiry has not passed is returned without
///   touching the catalog.
/// - **Miss or stale**: the catalog is asked. Concurrent resolutions of the
///   same identifier share one outstanding lookup.
/// - **Lookup success**: the entry is overwritten with a new expiry of
///   `now + ttl` and a snapshot write is requested from the persistence
///   worker. The caller does not wait for the write.
/// - **Lookup failure**: a stale entry is returned if one exists, otherwise
///   the failure is propagated.
///
/// Before the first resolution an empty cache is filled from the snapshot
/// store. Bootstrapped entries receive a full ttl regardless of their age.
///
/// The entry map sits behind a single mutex that is only held for map
/// operations, never across a lookup or a write.
///
/// Handles are cheap to clone and share the same cache.
pub struct MetadataCache<C, S> {
    inner: Arc<Inner<C, S>>,
}

struct Inner<C, S> {
    catalog: C,
    store: Arc<S>,
    entries: SharedEntries,
    inflight: Mutex<HashMap<AppId, InflightLookup>>,
    bootstrapped: OnceCell<()>,
    persister: Persister,
    clock: Arc<dyn Clock>,
    ttl: SignedDuration,
}

impl<C, S> Clone for MetadataCache<C, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, S> std::fmt::Debug for MetadataCache<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataCache")
            .field("entries", &self.inner.entries.lock().len())
            .field("ttl", &self.inner.ttl)
            .finish_non_exhaustive()
    }
}

impl<C: Catalog, S: SnapshotStore> MetadataCache<C, S> {
    /// Creates a cache with the default 24 hour ttl and the system clock.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, since the persistence
    /// worker is spawned here.
    pub fn new(catalog: C, store: S) -> Self {
        Self::with_config(catalog, store, CacheConfig::default())
    }

    /// Creates a cache with a custom configuration.
    pub fn with_config(catalog: C, store: S, config: CacheConfig) -> Self {
        Self::with_clock(catalog, store, config, Arc::new(SystemClock))
    }

    /// Creates a cache that reads the time from `clock`.
    pub fn with_clock(catalog: C, store: S, config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(store);
        let entries = SharedEntries::default();
        let persister = Persister::spawn(Arc::clone(&store), Arc::clone(&entries));

        Self {
            inner: Arc::new(Inner {
                catalog,
                store,
                entries,
                inflight: Mutex::new(HashMap::new()),
                bootstrapped: OnceCell::new(),
                persister,
                clock,
                ttl: config.ttl,
            }),
        }
    }

    /// Resolves one identifier to its record.
    ///
    /// # Returns
    ///
    /// * `Ok(record)` - A fresh cached record, a freshly fetched record, or a
    ///   stale record when the catalog could not be reached
    /// * `Err(CacheError::Lookup)` - The catalog failed and nothing is cached
    pub async fn resolve(&self, id: AppId) -> Result<AppRecord> {
        self.bootstrap().await;

        let now = self.inner.clock.now();
        if let Some(record) = self.inner.fresh_record(id, now) {
            trace!(app_id = %id, "Cache hit");
            return Ok(record);
        }

        trace!(app_id = %id, "Cache miss, looking up catalog");
        match self.lookup(id).await {
            Ok(record) => Ok(record),
            Err(source) => match self.inner.cached_record(id) {
                Some(record) => {
                    warn!(app_id = %id, error = %source, "Catalog lookup failed, serving stale entry");
                    Ok(record)
                }
                None => {
                    warn!(app_id = %id, error = %source, "Catalog lookup failed and nothing is cached");
                    Err(CacheError::Lookup { id, source })
                }
            },
        }
    }

    /// Returns every cached record, fresh or stale, sorted by identifier.
    pub fn snapshot(&self) -> Vec<AppRecord> {
        persist::snapshot(&self.inner.entries)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.lock().is_empty()
    }

    /// The ttl applied to new entries.
    pub fn ttl(&self) -> SignedDuration {
        self.inner.ttl
    }

    /// Waits until every snapshot write requested so far has been attempted.
    ///
    /// Call this before the process exits so the latest lookups reach disk.
    pub async fn flush(&self) {
        self.inner.persister.flush().await;
    }

    /// Fills an empty cache from the snapshot store, once per cache.
    async fn bootstrap(&self) {
        self.inner
            .bootstrapped
            .get_or_init(|| async {
                let populated = !self.inner.entries.lock().is_empty();
                if populated {
                    trace!("Cache already populated, skipping snapshot bootstrap");
                    return;
                }

                match self.inner.store.load().await {
                    Ok(records) => {
                        let count = records.len();
                        let expires_at = self.inner.expiry_from(self.inner.clock.now());
                        {
                            let mut entries = self.inner.entries.lock();
                            for record in records {
                                entries
                                    .entry(record.id)
                                    .or_insert_with(|| CacheEntry::new(record, expires_at));
                            }
                        }
                        info!(count, "Bootstrapped cache from snapshot");
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to load cache snapshot, starting empty");
                    }
                }
            })
            .await;
    }

    /// Looks up `id`, joining an outstanding lookup for the same id if any.
    ///
    /// The lookup runs on its own task, so it completes and clears its
    /// in-flight slot even when every caller waiting on it is dropped.
    async fn lookup(&self, id: AppId) -> std::result::Result<AppRecord, CatalogError> {
        let lookup = {
            let mut inflight = self.inner.inflight.lock();
            inflight
                .entry(id)
                .or_insert_with(|| {
                    let inner = Arc::clone(&self.inner);
                    tokio::spawn(async move {
                        let _slot = InflightSlot { inner: &inner, id };
                        inner.fetch_and_store(id).await
                    })
                    .map(|joined| {
                        joined.unwrap_or_else(|e| {
                            Err(CatalogError::Network(format!("lookup task failed: {e}")))
                        })
                    })
                    .boxed()
                    .shared()
                })
                .clone()
        };

        lookup.await
    }
}

/// Removes the in-flight slot of `id` when the lookup task finishes or unwinds.
///
/// Only the task that owns a slot removes it, so the slot present at drop
/// time is always this task's own.
struct InflightSlot<'a, C, S> {
    inner: &'a Inner<C, S>,
    id: AppId,
}

impl<C, S> Drop for InflightSlot<'_, C, S> {
    fn drop(&mut self) {
        self.inner.inflight.lock().remove(&self.id);
    }
}

impl<C: Catalog, S: SnapshotStore> Inner<C, S> {
    /// `now + ttl`, clamped to the representable range.
    fn expiry_from(&self, now: Timestamp) -> Timestamp {
        now.checked_add(self.ttl).unwrap_or(if self.ttl.is_negative() {
            Timestamp::MIN
        } else {
            Timestamp::MAX
        })
    }

    fn fresh_record(&self, id: AppId, now: Timestamp) -> Option<AppRecord> {
        self.entries
            .lock()
            .get(&id)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.record.clone())
    }

    fn cached_record(&self, id: AppId) -> Option<AppRecord> {
        self.entries
            .lock()
            .get(&id)
            .map(|entry| entry.record.clone())
    }

    async fn fetch_and_store(&self, id: AppId) -> std::result::Result<AppRecord, CatalogError> {
        let record = self.catalog.lookup(id).await?;

        let expires_at = self.expiry_from(self.clock.now());
        self.entries
            .lock()
            .insert(id, CacheEntry::new(record.clone(), expires_at));
        debug!(app_id = %id, title = %record.title, expires_at = %expires_at, "Cached catalog record");

        self.persister.request();
        Ok(record)
    }
}

#[async_trait]
impl<C: Catalog, S: SnapshotStore> Resolver for MetadataCache<C, S> {
    async fn resolve(&self, id: AppId) -> Result<AppRecord> {
        MetadataCache::resolve(self, id).await
    }
}
