//! Command implementations behind the `applist` binary.
//!
//! Each command writes its result to the given writer, one line per item,
//! with tab-separated columns.

use anyhow::Context;
use applist_cache::{BatchConfig, BatchResolver, MetadataCache};
use applist_core::{AppId, Catalog, SnapshotStore};
use applist_library::{Library, PackageCache};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

pub struct App<C, S> {
    library: Library,
    catalog: C,
    cache: MetadataCache<C, S>,
    batch: BatchResolver<MetadataCache<C, S>>,
}

impl<C: Catalog + Clone, S: SnapshotStore> App<C, S> {
    pub fn new(
        library: Library,
        catalog: C,
        cache: MetadataCache<C, S>,
        batch_config: BatchConfig,
    ) -> Self {
        let batch = BatchResolver::with_config(cache.clone(), batch_config);
        Self {
            library,
            catalog,
            cache,
            batch,
        }
    }

    /// `list`: installed apps with their titles.
    ///
    /// Waits for the metadata cache to reach disk before returning.
    pub async fn list(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let records = self.library.installed_apps(&self.batch).await?;
        info!(count = records.len(), "Listing installed apps");

        for record in &records {
            writeln!(out, "{}\t{}\t{}", record.id, record.title, record.thumbnail_url)?;
        }

        self.cache.flush().await;
        Ok(())
    }

    /// `search <term>`: store hits, flagging the ones already installed.
    pub async fn search(&self, term: &str, out: &mut impl Write) -> anyhow::Result<()> {
        let hits = self
            .library
            .search(&self.catalog, term)
            .await
            .with_context(|| format!("search for '{term}' failed"))?;

        for hit in &hits {
            let marker = if hit.installed { "installed" } else { "" };
            writeln!(out, "{}\t{}\t{}", hit.record.id, hit.record.title, marker)?;
        }
        Ok(())
    }

    /// `add <appid>`: prints the marker file that holds the app.
    pub async fn add(&self, id: AppId, out: &mut impl Write) -> anyhow::Result<()> {
        let path = self.library.add_app(id).await?;
        writeln!(out, "{}", path.display())?;
        Ok(())
    }

    /// `set-dir <path>`
    pub async fn set_dir(&mut self, path: PathBuf, out: &mut impl Write) -> anyhow::Result<()> {
        let steam = self
            .library
            .select_steam_dir(&path)
            .await
            .with_context(|| format!("cannot use '{}'", path.display()))?;
        writeln!(out, "{}", steam.path().display())?;
        Ok(())
    }

    /// `show-dir`
    pub async fn show_dir(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let steam = self.library.configured_dir().await?;
        writeln!(out, "{}", steam.path().display())?;
        Ok(())
    }

    /// `clear-package-cache`
    pub async fn clear_package_cache(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let message = match self.library.clear_package_cache().await? {
            PackageCache::Cleared => "Package cache cleared",
            PackageCache::AlreadyClear => "Package cache already clear",
        };
        writeln!(out, "{message}")?;
        Ok(())
    }
}
