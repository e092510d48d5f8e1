use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tinylink_core::store::Result;
use tinylink_core::{Alias, Link, LinkStore, StoreError};
use tracing::trace;

#[derive(Debug, Default)]
struct Indexes {
    /// alias -> original URL
    by_alias: HashMap<String, String>,
    /// original URL -> alias
    by_url: HashMap<String, String>,
}

/// In-memory implementation of [`LinkStore`].
///
/// Both indexes sit behind one lock so they are always updated as a pair:
/// an `add` either claims the URL and the alias together or changes nothing.
#[derive(Debug, Default)]
pub struct InMemoryLinkStore {
    indexes: RwLock<Indexes>,
}

impl InMemoryLinkStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory store with room for `capacity` links.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            indexes: RwLock::new(Indexes {
                by_alias: HashMap::with_capacity(capacity),
                by_url: HashMap::with_capacity(capacity),
            }),
        }
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.indexes.read().by_alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn add(&self, link: Link) -> Result<Alias> {
        let mut indexes = self.indexes.write();
        let Indexes { by_alias, by_url } = &mut *indexes;

        let url_slot = match by_url.entry(link.original_url) {
            Entry::Occupied(existing) => {
                trace!(alias = %existing.get(), "original url already stored");
                return Ok(Alias::new_unchecked(existing.get().clone()));
            }
            Entry::Vacant(slot) => slot,
        };

        match by_alias.entry(link.alias.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StoreError::AliasExists(link.alias.into_inner())),
            Entry::Vacant(alias_slot) => {
                alias_slot.insert(url_slot.key().clone());
                url_slot.insert(link.alias.as_str().to_owned());
                Ok(link.alias)
            }
        }
    }

    async fn get_by_alias(&self, alias: &Alias) -> Result<Link> {
        let indexes = self.indexes.read();

        match indexes.by_alias.get(alias.as_str()) {
            Some(original_url) => Ok(Link::new(alias.clone(), original_url.clone())),
            None => Err(StoreError::NotFound(alias.to_string())),
        }
    }
}
