use crate::app_id::AppId;
use thiserror::Error;

/// Result type for core validation.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid app id: {0}")]
    InvalidAppId(String),
}

/// Errors from the remote catalog.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Network(String),
    #[error("catalog request timed out: {0}")]
    Timeout(String),
    #[error("catalog returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("catalog response is malformed: {0}")]
    Parse(String),
}

/// Errors from a snapshot store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("snapshot io failed: {0}")]
    Io(String),
    #[error("snapshot is malformed: {0}")]
    Format(String),
}

/// Errors from the metadata cache.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("lookup for app {id} failed: {source}")]
    Lookup {
        id: AppId,
        #[source]
        source: CatalogError,
    },
}
