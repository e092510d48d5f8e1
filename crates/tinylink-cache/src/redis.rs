use async_trait::async_trait;
use redis::AsyncCommands;
use std::time::Duration;
use tinylink_core::cache::Result;
use tinylink_core::{Alias, CacheError, LinkCache};
use tracing::{debug, trace, warn};

use crate::DEFAULT_TTL_SECS;

const DEFAULT_KEY_PREFIX: &str = "tl:link:";

/// A Redis-based implementation of [`LinkCache`].
///
/// The original URL is stored as a plain string under `{prefix}{alias}`.
/// Entries expire after the configured TTL; with no TTL they persist until
/// evicted by Redis itself.
#[derive(Debug, Clone)]
pub struct RedisLinkCache {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
    ttl: Option<Duration>,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> CacheError {
    let message = format!("{operation}: {err}");
    if message.to_ascii_lowercase().contains("timed out") {
        CacheError::Timeout(message)
    } else if err.is_io_error() {
        CacheError::Unavailable(message)
    } else {
        CacheError::Operation(message)
    }
}

impl RedisLinkCache {
    /// Creates a new Redis link cache with the default prefix and a
    /// seven-day TTL.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self {
            conn,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            ttl: Some(Duration::from_secs(DEFAULT_TTL_SECS)),
        }
    }

    /// Connects to `redis_url` and creates a cache over the connection.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| CacheError::Initialization(format!("invalid redis url: {e}")))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;
        Ok(Self::new(conn))
    }

    /// Replaces the key prefix (e.g. "myapp:link:").
    pub fn with_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }

    /// Replaces the entry TTL. `None` or a zero duration disables expiry.
    ///
    /// Redis expiry has whole-second granularity; sub-second TTLs round up.
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl.filter(|ttl| !ttl.is_zero());
        self
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn ttl_secs(&self) -> Option<u64> {
        self.ttl.map(|ttl| {
            let secs = ttl.as_secs();
            if ttl.subsec_nanos() > 0 {
                secs + 1
            } else {
                secs
            }
        })
    }

    /// Generates the cache key for an alias.
    fn cache_key(&self, alias: &Alias) -> String {
        format!("{}{}", self.key_prefix, alias.as_str())
    }
}

#[async_trait]
impl LinkCache for RedisLinkCache {
    async fn get_url(&self, alias: &Alias) -> Result<Option<String>> {
        let key = self.cache_key(alias);
        trace!(alias = %alias, "Fetching original URL from Redis cache");

        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(original_url)) => {
                debug!(alias = %alias, "Cache hit in Redis");
                Ok(Some(original_url))
            }
            Ok(None) => {
                trace!(alias = %alias, "Cache miss in Redis");
                Ok(None)
            }
            Err(e) => {
                warn!(alias = %alias, error = %e, "Redis error on get");
                Err(map_redis_error("failed to fetch value from Redis", e))
            }
        }
    }

    async fn set_url(&self, alias: &Alias, original_url: &str) -> Result<()> {
        let key = self.cache_key(alias);
        trace!(alias = %alias, "Storing original URL in Redis cache");

        let mut conn = self.conn.clone();
        let written = match self.ttl_secs() {
            Some(secs) => conn.set_ex::<_, _, ()>(&key, original_url, secs).await,
            None => conn.set::<_, _, ()>(&key, original_url).await,
        };

        match written {
            Ok(()) => {
                debug!(alias = %alias, ttl_secs = ?self.ttl_secs(), "Cached link in Redis");
                Ok(())
            }
            Err(e) => {
                warn!(alias = %alias, error = %e, "Failed to cache link in Redis");
                Err(map_redis_error("failed to write value to Redis", e))
            }
        }
    }
}
