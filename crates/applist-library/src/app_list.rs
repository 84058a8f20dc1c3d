use crate::error::{io_error, Result};
use applist_core::AppId;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Name of the marker directory inside a Steam installation.
pub(crate) const APP_LIST_DIR: &str = "AppList";
const MARKER_EXTENSION: &str = "txt";

/// The marker directory: one `<index>.txt` file per unlocked app, each
/// holding the app's decimal identifier.
#[derive(Debug, Clone)]
pub struct AppList {
    dir: PathBuf,
}

impl AppList {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Identifiers of every readable marker, in file-name order.
    ///
    /// A missing directory is an empty list. Markers that cannot be read
    /// or parsed are skipped.
    pub async fn scan(&self) -> Result<Vec<AppId>> {
        let mut ids = Vec::new();
        for path in self.marker_files().await? {
            if let Some(id) = read_marker(&path).await {
                ids.push(id);
            }
        }
        debug!(dir = %self.dir.display(), count = ids.len(), "Scanned app list");
        Ok(ids)
    }

    /// Adds a marker for `id` and returns its path.
    ///
    /// The new file is named one past the highest numeric file stem, or
    /// `0.txt` in an empty directory. If a marker for `id` already exists
    /// its path is returned and nothing is written.
    pub async fn add(&self, id: AppId) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error("failed to create", &self.dir, e))?;

        let files = self.marker_files().await?;
        for path in &files {
            if read_marker(path).await == Some(id) {
                debug!(app_id = %id, path = %path.display(), "App already in app list");
                return Ok(path.clone());
            }
        }

        let next = files
            .iter()
            .filter_map(|path| path.file_stem()?.to_str()?.parse::<u64>().ok())
            .max()
            .map_or(0, |highest| highest + 1);

        let path = self.dir.join(format!("{next}.{MARKER_EXTENSION}"));
        tokio::fs::write(&path, id.to_string())
            .await
            .map_err(|e| io_error("failed to write", &path, e))?;

        debug!(app_id = %id, path = %path.display(), "Added app to app list");
        Ok(path)
    }

    /// Every `.txt` regular file in the directory, sorted by file name.
    async fn marker_files(&self) -> Result<Vec<PathBuf>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!(dir = %self.dir.display(), "App list directory does not exist");
                return Ok(Vec::new());
            }
            Err(e) => return Err(io_error("failed to read", &self.dir, e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error("failed to read", &self.dir, e))?
        {
            let path = entry.path();
            let is_marker = path.extension().is_some_and(|ext| ext == MARKER_EXTENSION);
            let is_file = entry.file_type().await.is_ok_and(|t| t.is_file());
            if is_marker && is_file {
                files.push(path);
            }
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }
}

async fn read_marker(path: &Path) -> Option<AppId> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Skipping unreadable marker");
            return None;
        }
    };

    match contents.parse::<AppId>() {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Skipping marker without an app id");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn id(raw: u32) -> AppId {
        AppId::new(raw).unwrap()
    }

    async fn write(dir: &Path, name: &str, contents: &str) {
        tokio::fs::write(dir.join(name), contents).await.unwrap();
    }

    #[tokio::test]
    async fn missing_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        let list = AppList::new(tmp.path().join("AppList"));

        assert!(list.scan().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn scan_reads_txt_markers_in_name_order() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "1.txt", "570\n").await;
        write(tmp.path(), "0.txt", " 440 ").await;
        write(tmp.path(), "notes.md", "730").await;
        write(tmp.path(), "2.txt", "not a number").await;
        write(tmp.path(), "3.txt", "0").await;
        tokio::fs::create_dir(tmp.path().join("4.txt")).await.unwrap();

        let ids = AppList::new(tmp.path()).scan().await.unwrap();

        assert_eq!(ids, vec![id(440), id(570)]);
    }

    #[tokio::test]
    async fn add_to_empty_directory_writes_zero() {
        let tmp = TempDir::new().unwrap();
        let list = AppList::new(tmp.path().join("AppList"));

        let path = list.add(id(440)).await.unwrap();

        assert_eq!(path, tmp.path().join("AppList").join("0.txt"));
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "440");
    }

    #[tokio::test]
    async fn add_uses_next_free_index_after_gaps() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "0.txt", "10").await;
        write(tmp.path(), "5.txt", "20").await;
        write(tmp.path(), "readme.txt", "hello").await;
        let list = AppList::new(tmp.path());

        let path = list.add(id(30)).await.unwrap();

        assert_eq!(path, tmp.path().join("6.txt"));
        assert_eq!(list.scan().await.unwrap(), vec![id(10), id(20), id(30)]);
    }

    #[tokio::test]
    async fn adding_existing_id_is_a_no_op() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "0.txt", "10").await;
        let list = AppList::new(tmp.path());

        let path = list.add(id(10)).await.unwrap();

        assert_eq!(path, tmp.path().join("0.txt"));
        assert_eq!(list.scan().await.unwrap(), vec![id(10)]);
    }
}
