use applist_core::{AppId, AppRecord, Catalog, CatalogError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

type LookupResult = Result<AppRecord, CatalogError>;

/// A scriptable in-process [`Catalog`].
///
/// Identifiers without a scripted response resolve to
/// [`AppRecord::unknown`], like a real catalog miss. Every lookup is
/// counted per identifier, and the highest number of lookups running at
/// the same time is tracked.
#[derive(Debug, Clone, Default)]
pub struct FakeCatalog {
    state: Arc<FakeState>,
}

#[derive(Debug, Default)]
struct FakeState {
    responses: Mutex<HashMap<AppId, LookupResult>>,
    default_delay: Mutex<Duration>,
    search_results: Mutex<Vec<AppRecord>>,
    calls: Mutex<HashMap<AppId, usize>>,
    searches: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Shorthand for a validated identifier in tests.
pub fn app_id(raw: u32) -> AppId {
    AppId::new(raw).expect("test app ids must be positive")
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a successful lookup.
    pub fn with_app(self, id: u32, title: &str, thumbnail_url: &str) -> Self {
        self.set_app(id, title, thumbnail_url);
        self
    }

    /// Scripts a failing lookup.
    pub fn with_failure(self, id: u32, error: CatalogError) -> Self {
        self.set_failure(id, error);
        self
    }

    /// Delays every lookup by `delay`.
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.state.default_delay.lock() = delay;
        self
    }

    pub fn set_app(&self, id: u32, title: &str, thumbnail_url: &str) {
        let id = app_id(id);
        self.state
            .responses
            .lock()
            .insert(id, Ok(AppRecord::new(id, title, thumbnail_url)));
    }

    pub fn set_failure(&self, id: u32, error: CatalogError) {
        self.state.responses.lock().insert(app_id(id), Err(error));
    }

    pub fn set_search_results(&self, results: Vec<AppRecord>) {
        *self.state.search_results.lock() = results;
    }

    /// Number of lookups issued for `id`.
    pub fn calls(&self, id: u32) -> usize {
        self.state
            .calls
            .lock()
            .get(&app_id(id))
            .copied()
            .unwrap_or(0)
    }

    /// Number of lookups issued for all identifiers.
    pub fn total_calls(&self) -> usize {
        self.state.calls.lock().values().sum()
    }

    pub fn searches(&self) -> usize {
        self.state.searches.load(Ordering::SeqCst)
    }

    /// Highest number of lookups observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn lookup(&self, id: AppId) -> LookupResult {
        *self.state.calls.lock().entry(id).or_insert(0) += 1;

        let running = self.state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.max_in_flight.fetch_max(running, Ordering::SeqCst);

        let delay = *self.state.default_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.state
            .responses
            .lock()
            .get(&id)
            .cloned()
            .unwrap_or_else(|| Ok(AppRecord::unknown(id)))
    }

    async fn search(&self, term: &str) -> Result<Vec<AppRecord>, CatalogError> {
        self.state.searches.fetch_add(1, Ordering::SeqCst);
        if term.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.state.search_results.lock().clone())
    }
}
