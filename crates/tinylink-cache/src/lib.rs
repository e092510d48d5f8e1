//! Resolution cache backends for tinylink.

pub mod moka;
pub mod redis;

pub use self::moka::{MokaCacheConfig, MokaLinkCache};
pub use self::redis::RedisLinkCache;
pub use tinylink_core::{CacheError, LinkCache};

/// Entry lifetime used when none is configured: seven days.
pub const DEFAULT_TTL_SECS: u64 = 604_800;
