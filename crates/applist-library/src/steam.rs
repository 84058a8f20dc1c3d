use crate::error::{io_error, LibraryError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const STEAM_EXECUTABLE: &str = "steam.exe";

/// What [`SteamDir::clear_package_cache`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageCache {
    Cleared,
    AlreadyClear,
}

/// A validated Steam installation directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SteamDir {
    root: PathBuf,
}

impl SteamDir {
    /// Opens `path` as a Steam directory.
    ///
    /// Fails with [`LibraryError::DirectoryInvalid`] unless `steam.exe`
    /// exists directly inside it.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let root = path.into();
        match tokio::fs::metadata(root.join(STEAM_EXECUTABLE)).await {
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(LibraryError::DirectoryInvalid(root.display().to_string()))
            }
            _ => {
                debug!(path = %root.display(), "Opened steam directory");
                Ok(Self { root })
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Path of the cached package metadata Steam rebuilds on start.
    pub fn package_cache_path(&self) -> PathBuf {
        self.root.join("appcache").join("packageinfo.vdf")
    }

    /// Removes the package metadata cache so Steam picks up app list changes.
    pub async fn clear_package_cache(&self) -> Result<PackageCache> {
        let path = self.package_cache_path();
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(path = %path.display(), "Cleared package cache");
                Ok(PackageCache::Cleared)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Package cache already clear");
                Ok(PackageCache::AlreadyClear)
            }
            Err(e) => Err(io_error("failed to remove", &path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn fake_install() -> TempDir {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("steam.exe"), b"").await.unwrap();
        tmp
    }

    #[tokio::test]
    async fn open_requires_steam_executable() {
        let tmp = TempDir::new().unwrap();

        let err = SteamDir::open(tmp.path()).await.unwrap_err();

        assert!(matches!(err, LibraryError::DirectoryInvalid(_)));
    }

    #[tokio::test]
    async fn open_accepts_install() {
        let tmp = fake_install().await;

        let steam = SteamDir::open(tmp.path()).await.unwrap();

        assert_eq!(steam.path(), tmp.path());
    }

    #[tokio::test]
    async fn clear_package_cache_reports_state() {
        let tmp = fake_install().await;
        let steam = SteamDir::open(tmp.path()).await.unwrap();
        tokio::fs::create_dir_all(tmp.path().join("appcache"))
            .await
            .unwrap();
        tokio::fs::write(steam.package_cache_path(), b"vdf").await.unwrap();

        assert_eq!(steam.clear_package_cache().await.unwrap(), PackageCache::Cleared);
        assert!(!steam.package_cache_path().exists());
        assert_eq!(
            steam.clear_package_cache().await.unwrap(),
            PackageCache::AlreadyClear
        );
    }
}
