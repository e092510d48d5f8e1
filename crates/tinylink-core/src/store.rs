use crate::alias::Alias;
use crate::error::StoreError;
use crate::link::Link;
use async_trait::async_trait;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Durable mapping between aliases and original URLs.
///
/// Both sides of the mapping are unique. Implementations must make the
/// "return the existing alias for this URL, otherwise insert" step of
/// [`add`](LinkStore::add) atomic: concurrent adds of the same URL end with a
/// single record, and every caller gets its alias back.
#[async_trait]
pub trait LinkStore: Send + Sync + 'static {
    /// Stores `link` and returns the alias now associated with its URL.
    ///
    /// If the URL is already stored, the previously stored alias is returned
    /// and nothing is written. Returns `Err(StoreError::AliasExists)` if the
    /// alias is taken by a different URL.
    async fn add(&self, link: Link) -> Result<Alias>;

    /// Retrieves the link stored under `alias`.
    ///
    /// Returns `Err(StoreError::NotFound)` if there is none.
    async fn get_by_alias(&self, alias: &Alias) -> Result<Link>;
}
