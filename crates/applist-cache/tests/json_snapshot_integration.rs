use std::sync::Arc;
use std::time::Duration;

use applist_cache::{BatchResolver, CacheConfig, MetadataCache};
use applist_core::{AppRecord, CatalogError, SnapshotStore};
use applist_storage::JsonSnapshotStore;
use applist_test_infra::{app_id, FakeCatalog, ManualClock};
use jiff::SignedDuration;
use tempfile::TempDir;

/// Test fixture holding a temporary directory with a snapshot path inside it.
struct SnapshotDir {
    #[allow(dead_code)]
    dir: TempDir,
    store: JsonSnapshotStore,
}

impl SnapshotDir {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonSnapshotStore::new(dir.path().join("GreenLuma").join("cache.json"));
        Self { dir, store }
    }

    fn store(&self) -> JsonSnapshotStore {
        self.store.clone()
    }

    async fn write(&self, records: &[AppRecord]) {
        self.store
            .save(records)
            .await
            .expect("Failed to seed snapshot");
    }

    async fn write_raw(&self, json: &str) {
        let path = self.store.path();
        tokio::fs::create_dir_all(path.parent().expect("snapshot path has a parent"))
            .await
            .expect("Failed to create snapshot dir");
        tokio::fs::write(path, json)
            .await
            .expect("Failed to seed raw snapshot");
    }

    async fn read(&self) -> Vec<AppRecord> {
        self.store.load().await.expect("Failed to read snapshot")
    }
}

#[tokio::test]
async fn test_lookup_reaches_disk_without_flush() {
    let fixture = SnapshotDir::new();
    let catalog = FakeCatalog::new().with_app(440, "Team Fortress 2", "https://img/440");
    let cache = MetadataCache::new(catalog, fixture.store());

    cache.resolve(app_id(440)).await.unwrap();

    let store = fixture.store();
    awaitility::at_most(Duration::from_secs(5))
        .poll_interval(Duration::from_millis(20))
        .until_async(move || {
            let store = store.clone();
            async move { store.load().await.map(|r| r.len() == 1).unwrap_or(false) }
        })
        .await;

    assert_eq!(
        fixture.read().await,
        vec![AppRecord::new(app_id(440), "Team Fortress 2", "https://img/440")]
    );
}

#[tokio::test]
async fn test_restarted_cache_serves_from_snapshot() {
    let fixture = SnapshotDir::new();

    let first_catalog = FakeCatalog::new()
        .with_app(10, "Ten", "")
        .with_app(20, "Twenty", "");
    let first = MetadataCache::new(first_catalog.clone(), fixture.store());
    first.resolve(app_id(10)).await.unwrap();
    first.resolve(app_id(20)).await.unwrap();
    first.flush().await;
    drop(first);

    let second_catalog = FakeCatalog::new();
    let second = MetadataCache::new(second_catalog.clone(), fixture.store());

    assert_eq!(second.resolve(app_id(10)).await.unwrap().title, "Ten");
    assert_eq!(second.resolve(app_id(20)).await.unwrap().title, "Twenty");
    assert_eq!(second_catalog.total_calls(), 0);
    assert_eq!(first_catalog.total_calls(), 2);
}

#[tokio::test]
async fn test_stale_snapshot_entry_survives_catalog_outage() {
    let fixture = SnapshotDir::new();
    fixture
        .write(&[AppRecord::new(app_id(5), "Old Title", "")])
        .await;

    let catalog = FakeCatalog::new().with_failure(5, CatalogError::Timeout("offline".to_string()));
    let clock = ManualClock::starting_now();
    let cache = MetadataCache::with_clock(
        catalog.clone(),
        fixture.store(),
        CacheConfig::default(),
        Arc::new(clock.clone()),
    );

    // Bootstrapped entries start fresh.
    assert_eq!(cache.resolve(app_id(5)).await.unwrap().title, "Old Title");
    assert_eq!(catalog.calls(5), 0);

    clock.advance(SignedDuration::from_hours(25));

    let record = cache.resolve(app_id(5)).await.unwrap();
    assert_eq!(record.title, "Old Title");
    assert_eq!(catalog.calls(5), 1);
}

#[tokio::test]
async fn test_malformed_snapshot_is_replaced() {
    let fixture = SnapshotDir::new();
    let path = fixture.store.path().to_path_buf();
    tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
    tokio::fs::write(&path, b"{ not json").await.unwrap();

    let catalog = FakeCatalog::new().with_app(7, "Seven", "");
    let cache = MetadataCache::new(catalog, fixture.store());

    assert_eq!(cache.resolve(app_id(7)).await.unwrap().title, "Seven");
    cache.flush().await;

    assert_eq!(fixture.read().await, vec![AppRecord::new(app_id(7), "Seven", "")]);
}

#[tokio::test]
async fn test_batch_results_are_persisted_in_id_order() {
    let fixture = SnapshotDir::new();
    let catalog = FakeCatalog::new()
        .with_app(30, "Thirty", "")
        .with_app(10, "Ten", "")
        .with_failure(20, CatalogError::Status {
            status: 503,
            body: "unavailable".to_string(),
        });
    let cache = MetadataCache::new(catalog, fixture.store());
    let batch = BatchResolver::new(cache.clone());

    let records = batch.resolve_all([app_id(30), app_id(20), app_id(10)]).await;
    cache.flush().await;

    assert_eq!(records.len(), 2);
    let ids = fixture
        .read()
        .await
        .iter()
        .map(|r| r.id.get())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![10, 30]);
}

#[tokio::test]
async fn test_invalid_snapshot_record_does_not_lose_the_rest() {
    let fixture = SnapshotDir::new();
    fixture
        .write_raw(
            r#"[
                {"appid": 440, "name": "Team Fortress 2", "image": "https://img/440"},
                {"appid": 0, "name": "Unknown", "image": ""}
            ]"#,
        )
        .await;
    let catalog = FakeCatalog::new()
        .with_failure(440, CatalogError::Timeout("offline".to_string()))
        .with_app(570, "Dota 2", "");
    let cache = MetadataCache::new(catalog.clone(), fixture.store());

    let record = cache.resolve(app_id(440)).await.unwrap();
    cache.resolve(app_id(570)).await.unwrap();
    cache.flush().await;

    assert_eq!(record.title, "Team Fortress 2");
    assert_eq!(catalog.calls(440), 0);
    let ids = fixture
        .read()
        .await
        .iter()
        .map(|r| r.id.get())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![440, 570]);
}
