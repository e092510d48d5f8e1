use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::time::Duration;
use tinylink_core::DEFAULT_ALPHABET;
use tinylink_shortener::{LinkServiceConfig, RetryPolicy};

pub const LISTEN_ADDR_ENV: &str = "TINYLINK_LISTEN_ADDR";
pub const DOMAIN_ENV: &str = "TINYLINK_DOMAIN";
pub const LINK_LENGTH_ENV: &str = "TINYLINK_LINK_LENGTH";
pub const LINK_ALPHABET_ENV: &str = "TINYLINK_LINK_ALPHABET";
pub const MAX_RETRIES_ENV: &str = "TINYLINK_MAX_RETRIES";
pub const RETRY_POLICY_ENV: &str = "TINYLINK_RETRY_POLICY";
pub const STORAGE_BACKEND_ENV: &str = "TINYLINK_STORAGE_BACKEND";
pub const POSTGRES_DSN_ENV: &str = "TINYLINK_POSTGRES_DSN";
pub const POSTGRES_TABLE_ENV: &str = "TINYLINK_POSTGRES_TABLE";
pub const CACHE_BACKEND_ENV: &str = "TINYLINK_CACHE_BACKEND";
pub const REDIS_URL_ENV: &str = "TINYLINK_REDIS_URL";
pub const CACHE_TTL_SECS_ENV: &str = "TINYLINK_CACHE_TTL_SECS";
pub const CACHE_CAPACITY_ENV: &str = "TINYLINK_CACHE_CAPACITY";
pub const CACHE_BACKFILL_ENV: &str = "TINYLINK_CACHE_BACKFILL";
pub const LOG_FORMAT_ENV: &str = "TINYLINK_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_DOMAIN: &str = "example.com";
pub const DEFAULT_POSTGRES_TABLE: &str = "links";
pub const DEFAULT_CACHE_CAPACITY: u64 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "postgres")]
    Postgres,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Postgres => write!(f, "postgres"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheBackendArg {
    #[value(name = "none")]
    None,
    #[value(name = "redis")]
    Redis,
    #[value(name = "moka")]
    Moka,
}

impl Display for CacheBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackendArg::None => write!(f, "none"),
            CacheBackendArg::Redis => write!(f, "redis"),
            CacheBackendArg::Moka => write!(f, "moka"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RetryPolicyArg {
    #[value(name = "fail-fast")]
    FailFast,
    #[value(name = "retry-all")]
    RetryAll,
}

impl Display for RetryPolicyArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RetryPolicyArg::FailFast => write!(f, "fail-fast"),
            RetryPolicyArg::RetryAll => write!(f, "retry-all"),
        }
    }
}

impl From<RetryPolicyArg> for RetryPolicy {
    fn from(arg: RetryPolicyArg) -> Self {
        match arg {
            RetryPolicyArg::FailFast => RetryPolicy::FailFast,
            RetryPolicyArg::RetryAll => RetryPolicy::RetryAll,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormatArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormatArg::Text => write!(f, "text"),
            LogFormatArg::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tinylink-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Domain used in the short links handed out.
    #[arg(long, env = DOMAIN_ENV, default_value = DEFAULT_DOMAIN)]
    pub domain: String,

    #[arg(long, env = LINK_LENGTH_ENV, default_value_t = tinylink_shortener::DEFAULT_LINK_LENGTH)]
    pub link_length: usize,

    #[arg(long, env = LINK_ALPHABET_ENV, default_value = DEFAULT_ALPHABET)]
    pub link_alphabet: String,

    /// Candidate aliases tried per save request.
    #[arg(
        long,
        env = MAX_RETRIES_ENV,
        default_value_t = tinylink_gateway::state::DEFAULT_MAX_RETRIES
    )]
    pub max_retries: usize,

    #[arg(
        long,
        env = RETRY_POLICY_ENV,
        value_enum,
        default_value_t = RetryPolicyArg::FailFast
    )]
    pub retry_policy: RetryPolicyArg,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = POSTGRES_DSN_ENV, required_if_eq("storage", "postgres"))]
    pub postgres_dsn: Option<String>,

    #[arg(long, env = POSTGRES_TABLE_ENV, default_value = DEFAULT_POSTGRES_TABLE)]
    pub postgres_table: String,

    #[arg(
        long,
        env = CACHE_BACKEND_ENV,
        value_enum,
        default_value_t = CacheBackendArg::None
    )]
    pub cache: CacheBackendArg,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("cache", "redis"))]
    pub redis_url: Option<String>,

    /// Cache entry lifetime; 0 disables expiry.
    #[arg(long, env = CACHE_TTL_SECS_ENV, default_value_t = tinylink_cache::DEFAULT_TTL_SECS)]
    pub cache_ttl_secs: u64,

    #[arg(long, env = CACHE_CAPACITY_ENV, default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: u64,

    /// Write links read from storage back into the cache.
    #[arg(long, env = CACHE_BACKFILL_ENV)]
    pub cache_backfill: bool,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,
}

impl CLI {
    pub fn service_config(&self) -> LinkServiceConfig {
        LinkServiceConfig::builder()
            .host(self.domain.clone())
            .alphabet(self.link_alphabet.clone())
            .link_length(self.link_length)
            .retry_policy(self.retry_policy.into())
            .backfill_cache(self.cache_backfill)
            .build()
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        Some(Duration::from_secs(self.cache_ttl_secs)).filter(|ttl| !ttl.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = CLI::try_parse_from(["gateway"]).unwrap();

        assert_eq!(cli.listen_addr, DEFAULT_LISTEN_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(cli.domain, "example.com");
        assert_eq!(cli.link_length, 10);
        assert_eq!(cli.link_alphabet, DEFAULT_ALPHABET);
        assert_eq!(cli.max_retries, 5);
        assert_eq!(cli.retry_policy, RetryPolicyArg::FailFast);
        assert_eq!(cli.storage, StorageBackendArg::InMemory);
        assert_eq!(cli.cache, CacheBackendArg::None);
        assert_eq!(cli.cache_ttl(), Some(Duration::from_secs(604_800)));
        assert!(!cli.cache_backfill);
        assert_eq!(cli.log_format, LogFormatArg::Text);
    }

    #[test]
    fn postgres_requires_dsn() {
        assert!(CLI::try_parse_from(["gateway", "--storage", "postgres"]).is_err());

        let cli = CLI::try_parse_from([
            "gateway",
            "--storage",
            "postgres",
            "--postgres-dsn",
            "postgres://localhost/tinylink",
        ])
        .unwrap();
        assert_eq!(cli.storage, StorageBackendArg::Postgres);
    }

    #[test]
    fn redis_requires_url() {
        assert!(CLI::try_parse_from(["gateway", "--cache", "redis"]).is_err());
    }

    #[test]
    fn service_config_from_flags() {
        let cli = CLI::try_parse_from([
            "gateway",
            "--domain",
            "sho.rt",
            "--link-length",
            "6",
            "--link-alphabet",
            "abc123",
            "--retry-policy",
            "retry-all",
            "--cache-backfill",
            "--cache-ttl-secs",
            "0",
        ])
        .unwrap();

        let config = cli.service_config();
        assert_eq!(config.host, "sho.rt");
        assert_eq!(config.link_length, 6);
        assert_eq!(config.alphabet, "abc123");
        assert_eq!(config.retry_policy, RetryPolicy::RetryAll);
        assert!(config.backfill_cache);
        assert_eq!(cli.cache_ttl(), None);
    }
}
