use crate::alias::Alias;
use crate::error::CacheError;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, CacheError>;

/// A fast-path lookup from alias to original URL.
///
/// Entry expiry is owned by the implementation; callers never pass a TTL.
#[async_trait]
pub trait LinkCache: Send + Sync + 'static {
    /// Get the original URL for `alias`.
    ///
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn get_url(&self, alias: &Alias) -> Result<Option<String>>;

    /// Store `original_url` under `alias`, replacing any previous entry.
    async fn set_url(&self, alias: &Alias, original_url: &str) -> Result<()>;
}
