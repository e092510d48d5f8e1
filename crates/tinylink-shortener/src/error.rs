use thiserror::Error;
use tinylink_core::{AliasError, CacheError, StoreError};

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors surfaced by [`LinkService`](crate::LinkService) operations.
///
/// Alias collisions are retried inside the service and never show up here.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("invalid url: '{0}'")]
    InvalidUrl(String),
    #[error("invalid link: {0}")]
    InvalidLink(#[from] AliasError),
    #[error("link not found: '{0}'")]
    NotFound(String),
    #[error("max retries exceeded after {0} attempts")]
    MaxRetriesExceeded(usize),
    #[error("{context}: {source}")]
    Internal {
        context: String,
        #[source]
        source: InternalError,
    },
}

/// The unexpected backend failure behind [`ServiceError::Internal`].
#[derive(Debug, Clone, Error)]
pub enum InternalError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Coarse classification of a [`ServiceError`], for callers that map
/// failures onto a transport (e.g. HTTP status codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidUrl,
    InvalidLink,
    NotFound,
    MaxRetriesExceeded,
    Internal,
}

impl ServiceError {
    pub(crate) fn internal(context: impl Into<String>, source: impl Into<InternalError>) -> Self {
        Self::Internal {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidUrl(_) => ErrorKind::InvalidUrl,
            ServiceError::InvalidLink(_) => ErrorKind::InvalidLink,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::MaxRetriesExceeded(_) => ErrorKind::MaxRetriesExceeded,
            ServiceError::Internal { .. } => ErrorKind::Internal,
        }
    }
}
