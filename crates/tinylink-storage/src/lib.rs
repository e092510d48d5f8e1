//! Link store backends.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryLinkStore;
pub use postgres::PostgresLinkStore;
pub use tinylink_core::{LinkStore, StoreError};
