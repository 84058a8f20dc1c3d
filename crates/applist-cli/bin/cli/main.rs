mod cli;

use crate::cli::{Command, CLI};
use anyhow::Context;
use applist_cache::{BatchConfig, MetadataCache};
use applist_catalog::{CatalogConfig, SteamCatalog};
use applist_cli::App;
use applist_library::{default_cache_path, default_config_path, ConfigStore, Library};
use applist_storage::JsonSnapshotStore;
use clap::Parser;
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    applist_telemetry::init(config.log_format.into())?;

    let config_path = match config.config_path {
        Some(path) => path,
        None => default_config_path()?,
    };
    let cache_path = match config.cache_path {
        Some(path) => path,
        None => default_cache_path()?,
    };

    debug!(
        config_path = %config_path.display(),
        cache_path = %cache_path.display(),
        catalog_url = %config.catalog_url,
        max_concurrency = config.max_concurrency,
        log_format = %config.log_format,
        "starting applist"
    );

    let catalog = SteamCatalog::with_config(
        CatalogConfig::builder()
            .base_url(config.catalog_url)
            .build(),
    )
    .context("failed to create catalog client")?;
    let cache = MetadataCache::new(catalog.clone(), JsonSnapshotStore::new(cache_path));
    let library = Library::load(ConfigStore::new(config_path)).await;
    let mut app = App::new(
        library,
        catalog,
        cache,
        BatchConfig::builder()
            .max_concurrency(config.max_concurrency)
            .build(),
    );

    let mut out = std::io::stdout().lock();
    match config.command {
        Command::List => app.list(&mut out).await,
        Command::Search { term } => app.search(&term.join(" "), &mut out).await,
        Command::Add { appid } => app.add(appid, &mut out).await,
        Command::SetDir { path } => app.set_dir(path, &mut out).await,
        Command::ShowDir => app.show_dir(&mut out).await,
        Command::ClearPackageCache => app.clear_package_cache(&mut out).await,
    }
}
