use jiff::SignedDuration;
use typed_builder::TypedBuilder;

/// How long a fetched record stays fresh.
pub const DEFAULT_TTL: SignedDuration = SignedDuration::from_hours(24);

/// How many lookups a batch runs at the same time.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Configuration for a [`MetadataCache`](crate::MetadataCache).
#[derive(Debug, Clone, TypedBuilder)]
pub struct CacheConfig {
    /// Time-to-live applied to fetched and bootstrapped entries.
    #[builder(default = DEFAULT_TTL)]
    pub ttl: SignedDuration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Configuration for a [`BatchResolver`](crate::BatchResolver).
#[derive(Debug, Clone, TypedBuilder)]
pub struct BatchConfig {
    /// Upper bound on concurrent resolutions; values below one are raised to one.
    #[builder(default = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(CacheConfig::default().ttl, SignedDuration::from_hours(24));
        assert_eq!(BatchConfig::default().max_concurrency, 8);
    }

    #[test]
    fn builder_overrides() {
        let config = CacheConfig::builder()
            .ttl(SignedDuration::from_mins(5))
            .build();
        assert_eq!(config.ttl, SignedDuration::from_mins(5));
    }
}
