//! Link allocation and resolution.
//!
//! [`LinkService`] ties a [`Generator`](tinylink_generator::Generator), a
//! [`LinkStore`](tinylink_core::LinkStore) and an optional
//! [`LinkCache`](tinylink_core::LinkCache) together: it allocates aliases with
//! collision retry, persists them with one alias per original URL, and
//! resolves aliases cache-first.

pub mod config;
pub mod error;
pub mod service;

pub use config::{LinkServiceConfig, RetryPolicy, DEFAULT_LINK_LENGTH};
pub use error::{ErrorKind, InternalError, ServiceError};
pub use service::LinkService;
