use crate::config::CatalogConfig;
use crate::response::{details_to_record, AppDetailsResponse, StoreSearchResponse};
use applist_core::{AppId, AppRecord, Catalog, CatalogError};
use async_trait::async_trait;
use moka::future::Cache;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

/// Type alias for catalog results.
pub type Result<T> = std::result::Result<T, CatalogError>;

const DETAILS_PATH: &str = "/api/appdetails";
const SEARCH_PATH: &str = "/api/storesearch/";

/// Longest error body kept in [`CatalogError::Status`].
const MAX_ERROR_BODY: usize = 2048;

/// A [`Catalog`] backed by the Steam store web API.
///
/// Lookups always hit the network; caching them is the job of the metadata
/// cache in front. Search results are kept in a small in-memory TTL cache,
/// and concurrent searches for the same term share one request.
#[derive(Debug, Clone)]
pub struct SteamCatalog {
    client: Client,
    config: CatalogConfig,
    searches: Cache<String, Vec<AppRecord>>,
}

impl SteamCatalog {
    /// Creates a client for the public store with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(CatalogConfig::default())
    }

    pub fn with_config(config: CatalogConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| CatalogError::Network(format!("failed to build http client: {e}")))?;

        let searches = Cache::builder()
            .max_capacity(config.search_capacity)
            .time_to_live(config.search_ttl)
            .build();

        Ok(Self {
            client,
            config,
            searches,
        })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self
            .client
            .get(self.endpoint(path))
            .query(query)
            .send()
            .await
            .map_err(map_request_error)?;

        let bytes = read_body(response).await?;
        serde_json::from_slice(&bytes).map_err(|e| CatalogError::Parse(e.to_string()))
    }

    async fn fetch_search(&self, term: &str) -> Result<Vec<AppRecord>> {
        trace!(term, "Searching catalog");
        let response: StoreSearchResponse = self
            .get_json(
                SEARCH_PATH,
                &[
                    ("term", term),
                    ("cc", self.config.region.as_str()),
                    ("l", self.config.language.as_str()),
                ],
            )
            .await?;

        let records = response.into_records();
        debug!(term, count = records.len(), "Catalog search completed");
        Ok(records)
    }
}

async fn read_body(response: Response) -> Result<Vec<u8>> {
    let status = response.status();
    if !status.is_success() {
        let body = read_error_body(response).await;
        return Err(CatalogError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await.map_err(map_request_error)?;
    Ok(bytes.to_vec())
}

/// Reads at most [`MAX_ERROR_BODY`] bytes of an error response.
async fn read_error_body(mut response: Response) -> String {
    let mut bytes = Vec::new();
    while bytes.len() < MAX_ERROR_BODY {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let take = chunk.len().min(MAX_ERROR_BODY - bytes.len());
                bytes.extend_from_slice(&chunk[..take]);
            }
            Ok(None) => break,
            Err(e) => {
                trace!(error = %e, "Failed to read error body");
                break;
            }
        }
    }

    let body = String::from_utf8_lossy(&bytes);
    truncate(&body, MAX_ERROR_BODY).to_string()
}

fn map_request_error(err: reqwest::Error) -> CatalogError {
    if err.is_timeout() {
        CatalogError::Timeout(err.to_string())
    } else {
        CatalogError::Network(err.to_string())
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[async_trait]
impl Catalog for SteamCatalog {
    async fn lookup(&self, id: AppId) -> Result<AppRecord> {
        trace!(app_id = %id, "Looking up app details");

        let appids = id.to_string();
        let response = self
            .get_json::<AppDetailsResponse>(
                DETAILS_PATH,
                &[
                    ("appids", appids.as_str()),
                    ("cc", self.config.region.as_str()),
                    ("l", self.config.language.as_str()),
                ],
            )
            .await
            .inspect_err(|e| debug!(app_id = %id, error = %e, "App details request failed"))?;

        let record = details_to_record(id, response);
        if record.is_unknown() {
            debug!(app_id = %id, "Catalog has no details for app");
        }
        Ok(record)
    }

    async fn search(&self, term: &str) -> Result<Vec<AppRecord>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        self.searches
            .try_get_with(term.to_string(), self.fetch_search(term))
            .await
            .map_err(|e| e.as_ref().clone())
    }
}
