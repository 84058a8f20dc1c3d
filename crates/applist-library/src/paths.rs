//! Per-user file locations.

use crate::error::{LibraryError, Result};
use std::path::PathBuf;

/// Folder created under the per-user config and cache directories.
pub const APP_DIR_NAME: &str = "GreenLuma";

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const CACHE_FILE_NAME: &str = "cache.json";

/// `<user config dir>/GreenLuma/config.json`
pub fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or(LibraryError::UserDirectoryUnavailable("config"))
}

/// `<user cache dir>/GreenLuma/cache.json`
pub fn default_cache_path() -> Result<PathBuf> {
    dirs::cache_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(CACHE_FILE_NAME))
        .ok_or(LibraryError::UserDirectoryUnavailable("cache"))
}
