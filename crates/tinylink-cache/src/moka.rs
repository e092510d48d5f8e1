use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tinylink_core::cache::Result;
use tinylink_core::{Alias, LinkCache};
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// An in-process cache implementation using Moka.
///
/// Suited to single-node deployments where a Redis round trip is not worth
/// paying. Entries are evicted by capacity and, when configured, by TTL.
#[derive(Debug, Clone)]
pub struct MokaLinkCache {
    cache: Cache<String, String>,
}

impl MokaLinkCache {
    /// Creates a new Moka link cache holding at most 10,000 entries, with no TTL.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    /// Creates a new Moka link cache with a custom maximum capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();
        Self { cache }
    }

    /// Creates a new Moka link cache whose entries expire `ttl` after insertion.
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Returns a builder for creating a custom cache configuration.
    pub fn builder() -> MokaCacheConfigBuilder {
        MokaCacheConfig::builder()
    }
}

impl Default for MokaLinkCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkCache for MokaLinkCache {
    async fn get_url(&self, alias: &Alias) -> Result<Option<String>> {
        trace!(alias = %alias, "Fetching original URL from Moka cache");

        match self.cache.get(alias.as_str()).await {
            Some(original_url) => {
                debug!(alias = %alias, "Cache hit in Moka");
                Ok(Some(original_url))
            }
            None => {
                trace!(alias = %alias, "Cache miss in Moka");
                Ok(None)
            }
        }
    }

    async fn set_url(&self, alias: &Alias, original_url: &str) -> Result<()> {
        self.cache
            .insert(alias.as_str().to_string(), original_url.to_string())
            .await;
        debug!(alias = %alias, "Cached link in Moka");
        Ok(())
    }
}

/// Configuration for creating a [`MokaLinkCache`] with custom settings.
#[derive(Debug, TypedBuilder, Default)]
pub struct MokaCacheConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default, setter(strip_option))]
    max_capacity: Option<u64>,
    /// Time-to-live for cache entries.
    #[builder(default, setter(strip_option))]
    ttl: Option<Duration>,
}

impl From<MokaCacheConfig> for MokaLinkCache {
    fn from(config: MokaCacheConfig) -> Self {
        let mut builder = Cache::builder();

        if let Some(capacity) = config.max_capacity {
            builder = builder.max_capacity(capacity);
        }

        if let Some(ttl) = config.ttl.filter(|ttl| !ttl.is_zero()) {
            builder = builder.time_to_live(ttl);
        }

        MokaLinkCache {
            cache: builder.build(),
        }
    }
}
