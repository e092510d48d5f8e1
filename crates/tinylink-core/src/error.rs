use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation timed out: {0}")]
    Timeout(String),
    #[error("cache serialization failed: {0}")]
    Serialization(String),
    #[error("cache value is invalid: {0}")]
    InvalidData(String),
    #[error("cache initialization failed: {0}")]
    Initialization(String),
    #[error("cache operation failed: {0}")]
    Operation(String),
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The alias is already taken by a different original URL.
    #[error("alias already exists: {0}")]
    AliasExists(String),
    #[error("no link stored for alias: {0}")]
    NotFound(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors raised while validating service configuration.
///
/// These are fatal at startup: a service is never built from a
/// configuration that produced one of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid host domain: '{0}'")]
    InvalidHost(String),
    #[error("invalid link length {0}; must be greater than zero")]
    InvalidLinkLength(usize),
    #[error("invalid link alphabet: {0}")]
    InvalidAlphabet(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AliasError {
    #[error("alias '{alias}' has length {actual}, expected {expected}")]
    Length {
        alias: String,
        expected: usize,
        actual: usize,
    },
    #[error("alias '{alias}' contains {ch:?}, which is not in the alphabet")]
    Character { alias: String, ch: char },
}
