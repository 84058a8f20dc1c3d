use crate::config::BatchConfig;
use crate::resolver::Resolver;
use applist_core::{AppId, AppRecord};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Resolves many identifiers concurrently through a [`Resolver`].
///
/// Each identifier runs as its own task; a shared semaphore caps how many
/// run at once. An identifier that fails to resolve is left out of the
/// result instead of failing the batch.
#[derive(Debug, Clone)]
pub struct BatchResolver<R> {
    resolver: R,
    limit: Arc<Semaphore>,
}

impl<R: Resolver> BatchResolver<R> {
    pub fn new(resolver: R) -> Self {
        Self::with_config(resolver, BatchConfig::default())
    }

    pub fn with_config(resolver: R, config: BatchConfig) -> Self {
        Self {
            resolver,
            limit: Arc::new(Semaphore::new(config.max_concurrency.max(1))),
        }
    }

    /// Returns a reference to the underlying resolver.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Resolves every distinct identifier in `ids`.
    ///
    /// Returns once every identifier has either resolved or failed. The
    /// output holds one record per resolved identifier in no particular
    /// order.
    pub async fn resolve_all<I>(&self, ids: I) -> Vec<AppRecord>
    where
        I: IntoIterator<Item = AppId>,
    {
        let ids = ids.into_iter().collect::<BTreeSet<_>>();
        let requested = ids.len();
        debug!(requested, "Resolving batch");

        // Kept apart from the cache lock so workers never queue behind lookups.
        let results = Arc::new(Mutex::new(Vec::with_capacity(requested)));
        let mut workers = JoinSet::new();

        for id in ids {
            let resolver = self.resolver.clone();
            let limit = Arc::clone(&self.limit);
            let results = Arc::clone(&results);

            workers.spawn(async move {
                let Ok(_permit) = limit.acquire_owned().await else {
                    warn!(app_id = %id, "Batch limiter closed, skipping app");
                    return;
                };

                match resolver.resolve(id).await {
                    Ok(record) => results.lock().push(record),
                    Err(e) => warn!(app_id = %id, error = %e, "Leaving unresolved app out of batch"),
                }
            });
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Batch worker did not finish");
            }
        }

        let records = std::mem::take(&mut *results.lock());
        debug!(requested, resolved = records.len(), "Batch resolved");
        records
    }
}
