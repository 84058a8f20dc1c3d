//! The local side of applist: user configuration, the Steam installation
//! and its `AppList` marker directory.

pub mod app_list;
pub mod config;
pub mod error;
pub mod library;
pub mod paths;
pub mod steam;

pub use app_list::AppList;
pub use config::{Config, ConfigStore};
pub use error::{LibraryError, Result};
pub use library::{Library, SearchHit};
pub use paths::{default_cache_path, default_config_path};
pub use steam::{PackageCache, SteamDir};
