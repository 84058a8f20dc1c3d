use crate::app_id::AppId;
use crate::error::CatalogError;
use crate::record::AppRecord;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, CatalogError>;

/// A remote source of application metadata.
#[async_trait]
pub trait Catalog: Send + Sync + 'static {
    /// Looks up a single identifier.
    ///
    /// An identifier the catalog does not know resolves to
    /// [`AppRecord::unknown`], not an error. Only transport failures,
    /// timeouts and malformed responses are errors.
    async fn lookup(&self, id: AppId) -> Result<AppRecord>;

    /// Searches the catalog by free-text term.
    ///
    /// A blank term yields an empty list.
    async fn search(&self, term: &str) -> Result<Vec<AppRecord>>;
}
