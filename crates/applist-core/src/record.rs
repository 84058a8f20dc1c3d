use crate::app_id::AppId;
use serde::{Deserialize, Serialize};

/// Title used when the catalog has no entry for an identifier.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Resolved catalog metadata for one application.
///
/// The serialized field names match the on-disk cache snapshot format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRecord {
    /// The catalog identifier.
    #[serde(rename = "appid")]
    pub id: AppId,
    /// Display title, or [`UNKNOWN_TITLE`] when the lookup found nothing.
    #[serde(rename = "name")]
    pub title: String,
    /// Header image URL; may be empty.
    #[serde(rename = "image", default)]
    pub thumbnail_url: String,
}

impl AppRecord {
    pub fn new(id: AppId, title: impl Into<String>, thumbnail_url: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            thumbnail_url: thumbnail_url.into(),
        }
    }

    /// The placeholder record for an identifier the catalog does not know.
    pub fn unknown(id: AppId) -> Self {
        Self::new(id, UNKNOWN_TITLE, "")
    }

    /// Returns `true` if this is the not-found placeholder.
    pub fn is_unknown(&self) -> bool {
        self.title == UNKNOWN_TITLE && self.thumbnail_url.is_empty()
    }
}
