use applist_core::{AppRecord, SnapshotStore, StoreError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;

/// A [`SnapshotStore`] that keeps the snapshot in a single JSON file.
///
/// The file holds a pretty-printed array of records. Saves go through a
/// sibling temporary file that is renamed over the target, so readers see
/// either the old snapshot or the new one.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn io_error(operation: &str, path: &Path, err: std::io::Error) -> StoreError {
    StoreError::Io(format!("{operation} '{}': {err}", path.display()))
}

impl JsonSnapshotStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// Nothing is touched on disk until the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the snapshot file location.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotStore for JsonSnapshotStore {
    async fn load(&self) -> Result<Vec<AppRecord>> {
        trace!(path = %self.path.display(), "Loading cache snapshot");

        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No cache snapshot on disk yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(io_error("failed to read", &self.path, e)),
        };

        let elements = serde_json::from_slice::<Vec<serde_json::Value>>(&bytes).map_err(|e| {
            StoreError::Format(format!("invalid snapshot '{}': {e}", self.path.display()))
        })?;

        // One bad record must not discard the rest of the snapshot.
        let total = elements.len();
        let records = elements
            .into_iter()
            .enumerate()
            .filter_map(|(index, element)| {
                serde_json::from_value::<AppRecord>(element)
                    .inspect_err(|e| {
                        warn!(path = %self.path.display(), index, error = %e, "Skipping invalid snapshot record");
                    })
                    .ok()
            })
            .collect::<Vec<_>>();

        debug!(
            path = %self.path.display(),
            count = records.len(),
            skipped = total - records.len(),
            "Loaded cache snapshot"
        );
        Ok(records)
    }

    async fn save(&self, records: &[AppRecord]) -> Result<()> {
        trace!(path = %self.path.display(), count = records.len(), "Saving cache snapshot");

        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| StoreError::Format(format!("failed to serialize snapshot: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("failed to create", parent, e))?;
        }

        let tmp = tmp_path(&self.path);
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| io_error("failed to write", &tmp, e))?;

        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                warn!(path = %tmp.display(), error = %cleanup, "Failed to remove temporary snapshot");
            }
            return Err(io_error("failed to replace", &self.path, e));
        }

        debug!(path = %self.path.display(), count = records.len(), "Saved cache snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use applist_core::AppId;

    fn record(id: u32, title: &str) -> AppRecord {
        AppRecord::new(
            AppId::new(id).unwrap(),
            title,
            format!("https://img.example/{id}.jpg"),
        )
    }

    #[tokio::test]
    async fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("cache.json"));

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_keeps_every_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("cache.json"));
        let records = vec![record(10, "Ten"), record(20, "Twenty"), record(30, "Thirty")];

        store.save(&records).await.unwrap();
        let mut loaded = store.load().await.unwrap();
        loaded.sort_by_key(|r| r.id);

        assert_eq!(loaded, records);
    }

    #[tokio::test]
    async fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("GreenLuma").join("nested").join("cache.json");
        let store = JsonSnapshotStore::new(&path);

        store.save(&[record(1, "One")]).await.unwrap();

        assert!(path.exists());
        assert!(!tmp_path(&path).exists());
    }

    #[tokio::test]
    async fn save_writes_indented_snapshot_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let store = JsonSnapshotStore::new(&path);

        store.save(&[record(7, "Seven")]).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains('\n'), "snapshot should be indented");
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["appid"], 7);
        assert_eq!(value[0]["name"], "Seven");
        assert_eq!(value[0]["image"], "https://img.example/7.jpg");
    }

    #[tokio::test]
    async fn save_replaces_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("cache.json"));

        store.save(&[record(1, "One"), record(2, "Two")]).await.unwrap();
        store.save(&[record(3, "Three")]).await.unwrap();

        assert_eq!(store.load().await.unwrap(), vec![record(3, "Three")]);
    }

    #[tokio::test]
    async fn malformed_file_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let store = JsonSnapshotStore::new(&path);

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, StoreError::Format(_)));
    }

    #[tokio::test]
    async fn invalid_records_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(
            &path,
            br#"[
                {"appid": 440, "name": "Team Fortress 2", "image": "https://img.example/440.jpg"},
                {"appid": 0, "name": "Unknown", "image": ""},
                {"appid": -3, "name": "Negative"},
                {"name": "No id"},
                "garbage",
                {"appid": 570, "name": "Dota 2"}
            ]"#,
        )
        .unwrap();
        let store = JsonSnapshotStore::new(&path);

        let loaded = store.load().await.unwrap();

        assert_eq!(
            loaded,
            vec![
                record(440, "Team Fortress 2"),
                AppRecord::new(AppId::new(570).unwrap(), "Dota 2", ""),
            ]
        );
    }

    #[tokio::test]
    async fn non_array_snapshot_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, br#"{"appid": 440, "name": "Team Fortress 2"}"#).unwrap();
        let store = JsonSnapshotStore::new(&path);

        assert!(matches!(store.load().await, Err(StoreError::Format(_))));
    }

    #[tokio::test]
    async fn unreadable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be read as a file.
        let store = JsonSnapshotStore::new(dir.path());

        assert!(matches!(store.load().await, Err(StoreError::Io(_))));
    }

    #[tokio::test]
    async fn failed_save_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let store = JsonSnapshotStore::new(&path);
        store.save(&[record(1, "One")]).await.unwrap();

        // Occupy the temporary path with a directory so the write fails.
        std::fs::create_dir(tmp_path(&path)).unwrap();
        assert!(store.save(&[record(2, "Two")]).await.is_err());

        assert_eq!(store.load().await.unwrap(), vec![record(1, "One")]);
    }
}
