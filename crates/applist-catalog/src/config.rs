use std::time::Duration;
use typed_builder::TypedBuilder;

pub const DEFAULT_BASE_URL: &str = "https://store.steampowered.com";
pub const DEFAULT_REGION: &str = "us";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
pub const DEFAULT_SEARCH_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_SEARCH_CAPACITY: u64 = 256;

/// Configuration for a [`SteamCatalog`](crate::SteamCatalog).
#[derive(Debug, Clone, TypedBuilder)]
pub struct CatalogConfig {
    /// Scheme and host of the store, without a trailing path.
    #[builder(default = DEFAULT_BASE_URL.to_string(), setter(into))]
    pub base_url: String,

    /// Store region sent as `cc`.
    #[builder(default = DEFAULT_REGION.to_string(), setter(into))]
    pub region: String,

    /// Store language sent as `l`.
    #[builder(default = DEFAULT_LANGUAGE.to_string(), setter(into))]
    pub language: String,

    /// Whole-request timeout, connect through body.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,

    #[builder(default = DEFAULT_USER_AGENT.to_string(), setter(into))]
    pub user_agent: String,

    /// How long search results are reused.
    #[builder(default = DEFAULT_SEARCH_TTL)]
    pub search_ttl: Duration,

    /// Maximum number of search terms kept.
    #[builder(default = DEFAULT_SEARCH_CAPACITY)]
    pub search_capacity: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_public_store() {
        let config = CatalogConfig::default();

        assert_eq!(config.base_url, "https://store.steampowered.com");
        assert_eq!(config.region, "us");
        assert_eq!(config.language, "en");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.search_ttl, Duration::from_secs(300));
    }

    #[test]
    fn builder_accepts_str() {
        let config = CatalogConfig::builder()
            .base_url("http://127.0.0.1:8080")
            .region("de")
            .build();

        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.region, "de");
        assert_eq!(config.language, "en");
    }
}
