use tinylink_core::{ConfigError, DEFAULT_ALPHABET};
use typed_builder::TypedBuilder;

pub const DEFAULT_LINK_LENGTH: usize = 10;

const MAX_DOMAIN_LENGTH: usize = 253;
const MAX_LABEL_LENGTH: usize = 63;

/// How [`LinkService::save`](crate::LinkService::save) treats store errors
/// other than an alias collision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Surface the error at once as an internal failure.
    #[default]
    FailFast,
    /// Spend another allocation attempt, as for a collision.
    RetryAll,
}

/// Settings for a [`LinkService`](crate::LinkService).
///
/// Validated once when the service is built; a service never exists with a
/// configuration that failed validation.
#[derive(Debug, Clone, TypedBuilder)]
pub struct LinkServiceConfig {
    /// Domain of the produced short URLs, e.g. `example.com`.
    #[builder(setter(into))]
    pub host: String,
    /// Characters aliases are drawn from, in draw order.
    #[builder(default = DEFAULT_ALPHABET.to_string(), setter(into))]
    pub alphabet: String,
    /// Alias length in characters.
    #[builder(default = DEFAULT_LINK_LENGTH)]
    pub link_length: usize,
    #[builder(default)]
    pub retry_policy: RetryPolicy,
    /// Write store hits back into the cache on reads.
    #[builder(default = false)]
    pub backfill_cache: bool,
}

/// Checks that `host` is a bare domain name: dot-separated labels of letters,
/// digits and inner hyphens. Schemes, ports, paths and IP addresses are
/// rejected.
pub(crate) fn validate_host(host: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::InvalidHost(host.to_string());

    if host.is_empty() || host.len() > MAX_DOMAIN_LENGTH {
        return Err(invalid());
    }

    for label in host.split('.') {
        let well_formed = !label.is_empty()
            && label.len() <= MAX_LABEL_LENGTH
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !well_formed {
            return Err(invalid());
        }
    }

    // An all-digit top label makes the host an IPv4 address, not a domain.
    let top = host.rsplit('.').next().unwrap_or_default();
    if top.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    Ok(())
}
