use crate::config::{Config, ConfigStore};
use crate::error::{LibraryError, Result};
use crate::steam::{PackageCache, SteamDir};
use crate::app_list::{AppList, APP_LIST_DIR};
use applist_cache::{BatchResolver, Resolver};
use applist_core::{AppId, AppRecord, Catalog};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

/// A catalog search result annotated with whether it is in the app list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub record: AppRecord,
    pub installed: bool,
}

/// The user's configured Steam installation and its app list.
#[derive(Debug, Clone)]
pub struct Library {
    store: ConfigStore,
    config: Config,
}

impl Library {
    /// Loads the configuration from `store`.
    pub async fn load(store: ConfigStore) -> Self {
        let config = store.load().await;
        Self { store, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The configured directory, validated.
    pub async fn configured_dir(&self) -> Result<SteamDir> {
        SteamDir::open(self.steam_path()?).await
    }

    /// Validates `path` and saves it as the configured directory.
    pub async fn select_steam_dir(&mut self, path: impl Into<PathBuf>) -> Result<SteamDir> {
        let steam = SteamDir::open(path).await?;

        self.config.steam_dir = Some(steam.path().to_path_buf());
        self.store.save(&self.config).await?;

        info!(path = %steam.path().display(), "Selected steam directory");
        Ok(steam)
    }

    /// Identifiers in the app list, in file-name order.
    pub async fn installed_ids(&self) -> Result<Vec<AppId>> {
        self.app_list()?.scan().await
    }

    /// Resolves every app in the app list, sorted by identifier.
    ///
    /// Apps whose metadata cannot be resolved are left out.
    pub async fn installed_apps<R: Resolver>(
        &self,
        batch: &BatchResolver<R>,
    ) -> Result<Vec<AppRecord>> {
        let ids = self.installed_ids().await?;
        let mut records = batch.resolve_all(ids).await;
        records.sort_by_key(|record| record.id);
        debug!(count = records.len(), "Resolved installed apps");
        Ok(records)
    }

    /// Adds `id` to the app list, returning the marker path.
    pub async fn add_app(&self, id: AppId) -> Result<PathBuf> {
        self.app_list()?.add(id).await
    }

    /// Searches `catalog` and flags hits that are already in the app list.
    ///
    /// Without a configured directory nothing is flagged as installed.
    pub async fn search<C: Catalog>(&self, catalog: &C, term: &str) -> Result<Vec<SearchHit>> {
        let records = catalog.search(term).await?;

        let installed = match self.app_list() {
            Ok(list) => list.scan().await?.into_iter().collect::<HashSet<_>>(),
            Err(LibraryError::ConfigurationMissing) => {
                trace!("No steam directory configured, nothing marked installed");
                HashSet::new()
            }
            Err(e) => return Err(e),
        };

        Ok(records
            .into_iter()
            .map(|record| SearchHit {
                installed: installed.contains(&record.id),
                record,
            })
            .collect())
    }

    /// Removes the package metadata cache of the configured directory.
    pub async fn clear_package_cache(&self) -> Result<PackageCache> {
        self.configured_dir().await?.clear_package_cache().await
    }

    fn steam_path(&self) -> Result<&Path> {
        self.config
            .steam_dir
            .as_deref()
            .ok_or(LibraryError::ConfigurationMissing)
    }

    fn app_list(&self) -> Result<AppList> {
        Ok(AppList::new(self.steam_path()?.join(APP_LIST_DIR)))
    }
}
