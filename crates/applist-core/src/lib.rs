//! Core types and traits for applist.
//!
//! This crate provides the identifier and record types plus the traits
//! shared by the cache, the snapshot stores and the catalog client.

pub mod app_id;
pub mod catalog;
pub mod clock;
pub mod error;
pub mod record;
pub mod store;

pub use app_id::AppId;
pub use catalog::Catalog;
pub use clock::{Clock, SystemClock};
pub use error::{CacheError, CatalogError, CoreError, StoreError};
pub use record::{AppRecord, UNKNOWN_TITLE};
pub use store::SnapshotStore;
