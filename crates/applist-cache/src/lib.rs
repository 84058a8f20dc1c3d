//! Metadata cache for catalog records.
//!
//! [`MetadataCache`] answers single-identifier lookups from memory, a disk
//! snapshot or the remote catalog, and [`BatchResolver`] fans a set of
//! identifiers out across it.
//!
//! # Example
//!
//! ```rust,no_run
//! use applist_cache::{BatchResolver, MetadataCache};
//! use applist_catalog::SteamCatalog;
//! use applist_core::AppId;
//! use applist_storage::JsonSnapshotStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = SteamCatalog::new()?;
//! let store = JsonSnapshotStore::new("/tmp/applist/cache.json");
//! let cache = MetadataCache::new(catalog, store);
//! let batch = BatchResolver::new(cache.clone());
//!
//! let records = batch.resolve_all([AppId::new(440)?, AppId::new(570)?]).await;
//! for record in records {
//!     println!("{} {}", record.id, record.title);
//! }
//!
//! // Make sure the latest lookups reach disk before exiting.
//! cache.flush().await;
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod config;
pub mod entry;
pub mod metadata;
mod persist;
pub mod resolver;

pub use batch::BatchResolver;
pub use config::{BatchConfig, CacheConfig, DEFAULT_MAX_CONCURRENCY, DEFAULT_TTL};
pub use entry::CacheEntry;
pub use metadata::MetadataCache;
pub use resolver::Resolver;
