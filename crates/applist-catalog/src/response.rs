//! Wire shapes of the store API.

use applist_core::{AppId, AppRecord};
use serde::Deserialize;
use std::collections::HashMap;

/// `/api/appdetails` answers with an object keyed by the requested id, or
/// `null` when the request itself was rejected.
pub(crate) type AppDetailsResponse = Option<HashMap<String, AppDetailsEntry>>;

#[derive(Debug, Deserialize)]
pub(crate) struct AppDetailsEntry {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<AppDetailsData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AppDetailsData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub header_image: String,
}

/// Turns a details response into the record for `id`.
///
/// Anything short of a successful entry with data yields the unknown record.
pub(crate) fn details_to_record(id: AppId, response: AppDetailsResponse) -> AppRecord {
    response
        .and_then(|mut entries| entries.remove(&id.to_string()))
        .filter(|entry| entry.success)
        .and_then(|entry| entry.data)
        .map(|data| AppRecord::new(id, data.name, data.header_image))
        .unwrap_or_else(|| AppRecord::unknown(id))
}

#[derive(Debug, Deserialize)]
pub(crate) struct StoreSearchResponse {
    #[serde(default)]
    pub items: Vec<StoreSearchItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StoreSearchItem {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tiny_image: String,
}

impl StoreSearchResponse {
    /// Converts hits to records, dropping any without a usable id.
    pub(crate) fn into_records(self) -> Vec<AppRecord> {
        self.items
            .into_iter()
            .filter_map(|item| {
                AppId::new(item.id)
                    .ok()
                    .map(|id| AppRecord::new(id, item.name, item.tiny_image))
            })
            .collect()
    }
}
