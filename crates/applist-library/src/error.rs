use applist_core::CatalogError;
use std::path::Path;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LibraryError>;

#[derive(Debug, Clone, Error)]
pub enum LibraryError {
    #[error("steam directory is not configured")]
    ConfigurationMissing,
    #[error("not a steam directory (no steam.exe): {0}")]
    DirectoryInvalid(String),
    #[error("no per-user {0} directory on this platform")]
    UserDirectoryUnavailable(&'static str),
    #[error("io error: {0}")]
    Io(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

pub(crate) fn io_error(operation: &str, path: &Path, err: std::io::Error) -> LibraryError {
    LibraryError::Io(format!("{operation} '{}': {err}", path.display()))
}
