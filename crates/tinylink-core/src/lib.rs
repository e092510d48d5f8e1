//! Core types and traits for the tinylink URL shortener.
//!
//! This crate holds the link model, the alias format, and the collaborator
//! contracts ([`LinkStore`], [`LinkCache`]) that the link service depends on.
//! Concrete backends live in `tinylink-storage` and `tinylink-cache`.

pub mod alias;
pub mod cache;
pub mod error;
pub mod link;
pub mod store;

pub use alias::{Alias, AliasFormat, DEFAULT_ALPHABET};
pub use cache::LinkCache;
pub use error::{AliasError, CacheError, ConfigError, StoreError};
pub use link::Link;
pub use store::LinkStore;
