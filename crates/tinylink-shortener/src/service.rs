use std::fmt;
use std::sync::Arc;

use tinylink_core::{Alias, AliasFormat, ConfigError, Link, LinkCache, LinkStore, StoreError};
use tinylink_generator::{Generator, RandomGenerator};
use tracing::{debug, error, info, trace, warn};
use url::Url;

use crate::config::{validate_host, LinkServiceConfig, RetryPolicy};
use crate::error::{Result, ServiceError};

/// Creates short links and resolves them back to their original URLs.
///
/// The service owns no mutable state of its own; all of it lives behind the
/// store and cache. Share it across tasks behind an [`Arc`].
pub struct LinkService {
    store: Arc<dyn LinkStore>,
    cache: Option<Arc<dyn LinkCache>>,
    generator: Arc<dyn Generator>,
    format: AliasFormat,
    base_url: Url,
    retry_policy: RetryPolicy,
    backfill_cache: bool,
}

impl fmt::Debug for LinkService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkService")
            .field("format", &self.format)
            .field("base_url", &self.base_url.as_str())
            .field("cache", &self.cache.is_some())
            .field("retry_policy", &self.retry_policy)
            .field("backfill_cache", &self.backfill_cache)
            .finish_non_exhaustive()
    }
}

impl LinkService {
    /// Builds a service from its collaborators, validating `config`.
    ///
    /// `generator` must produce strings over `config.alphabet`; aliases it
    /// produces are persisted as-is.
    pub fn new(
        store: Arc<dyn LinkStore>,
        cache: Option<Arc<dyn LinkCache>>,
        generator: Arc<dyn Generator>,
        config: LinkServiceConfig,
    ) -> std::result::Result<Self, ConfigError> {
        validate_host(&config.host)?;
        let format = AliasFormat::new(&config.alphabet, config.link_length)?;
        let base_url = Url::parse(&format!("https://{}/", config.host))
            .map_err(|_| ConfigError::InvalidHost(config.host.clone()))?;

        Ok(Self {
            store,
            cache,
            generator,
            format,
            base_url,
            retry_policy: config.retry_policy,
            backfill_cache: config.backfill_cache,
        })
    }

    /// Builds a service that draws aliases uniformly from the configured
    /// alphabet.
    pub fn with_random_generator(
        store: Arc<dyn LinkStore>,
        cache: Option<Arc<dyn LinkCache>>,
        config: LinkServiceConfig,
    ) -> std::result::Result<Self, ConfigError> {
        validate_host(&config.host)?;
        let format = AliasFormat::new(&config.alphabet, config.link_length)?;
        let generator = Arc::new(RandomGenerator::from_format(&format));
        Self::new(store, cache, generator, config)
    }

    pub fn format(&self) -> &AliasFormat {
        &self.format
    }

    /// Domain the short URLs point at.
    pub fn host(&self) -> &str {
        self.base_url.host_str().unwrap_or_default()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    /// Shortens `original_url`, returning `https://{host}/{alias}`.
    ///
    /// A URL that is already stored keeps its alias. At most `max_retries`
    /// candidate aliases are tried; with `max_retries == 0` the store is never
    /// called and the result is [`ServiceError::MaxRetriesExceeded`].
    pub async fn save(&self, original_url: &str, max_retries: usize) -> Result<String> {
        validate_url(original_url)?;

        let alias = self.allocate(original_url, max_retries).await?;

        if let Some(cache) = &self.cache {
            cache.set_url(&alias, original_url).await.map_err(|e| {
                error!(alias = %alias, error = %e, "failed to cache saved link");
                ServiceError::internal(format!("failed to cache link '{alias}'"), e)
            })?;
        }

        Ok(self.short_url(&alias))
    }

    /// Resolves a bare alias to the original URL it was saved for.
    ///
    /// The cache is consulted first; a cache miss or cache failure falls
    /// through to the store.
    pub async fn get_original_url(&self, alias: &str) -> Result<String> {
        let alias = self.format.parse(alias)?;

        if let Some(cache) = &self.cache {
            match cache.get_url(&alias).await {
                Ok(Some(original_url)) => {
                    debug!(alias = %alias, "resolved link from cache");
                    return Ok(original_url);
                }
                Ok(None) => trace!(alias = %alias, "link not cached"),
                Err(e) => {
                    warn!(alias = %alias, error = %e, "cache lookup failed, falling back to store")
                }
            }
        }

        let link = self.store.get_by_alias(&alias).await.map_err(|e| match e {
            StoreError::NotFound(_) => ServiceError::NotFound(alias.to_string()),
            other => {
                error!(alias = %alias, error = %other, "failed to read link from store");
                ServiceError::internal(format!("failed to get original url for '{alias}'"), other)
            }
        })?;

        if self.backfill_cache {
            if let Some(cache) = &self.cache {
                if let Err(e) = cache.set_url(&alias, &link.original_url).await {
                    warn!(alias = %alias, error = %e, "failed to backfill cache");
                }
            }
        }

        Ok(link.original_url)
    }

    async fn allocate(&self, original_url: &str, max_retries: usize) -> Result<Alias> {
        for attempt in 1..=max_retries {
            let candidate = Alias::new_unchecked(self.generator.generate(self.format.length()));

            match self.store.add(Link::new(candidate, original_url)).await {
                Ok(alias) => {
                    info!(alias = %alias, attempt, "saved link");
                    return Ok(alias);
                }
                Err(StoreError::AliasExists(taken)) => {
                    debug!(alias = %taken, attempt, "alias already taken, retrying");
                }
                Err(e) => match self.retry_policy {
                    RetryPolicy::FailFast => {
                        error!(original_url, attempt, error = %e, "failed to save link");
                        return Err(ServiceError::internal(
                            format!("failed to save '{original_url}'"),
                            e,
                        ));
                    }
                    RetryPolicy::RetryAll => {
                        warn!(original_url, attempt, error = %e, "failed to save link, retrying");
                    }
                },
            }
        }

        warn!(original_url, max_retries, "gave up allocating an alias");
        Err(ServiceError::MaxRetriesExceeded(max_retries))
    }

    fn short_url(&self, alias: &Alias) -> String {
        let mut url = self.base_url.clone();
        // The base is always an https URL with a host, so it has path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(alias.as_str());
        }
        url.into()
    }
}

/// Accepts absolute `scheme://host...` URLs.
///
/// The raw input is what gets stored, so it is checked as well as the parsed
/// form: `Url::parse` trims whitespace, drops tabs and newlines, and accepts
/// `https:host` and backslash separators.
fn validate_url(original_url: &str) -> Result<()> {
    let invalid = || ServiceError::InvalidUrl(original_url.to_string());

    if original_url
        .chars()
        .any(|c| c.is_ascii_whitespace() || c.is_control() || c == '\\')
    {
        return Err(invalid());
    }

    let parsed = Url::parse(original_url).map_err(|_| invalid())?;

    let has_authority = original_url
        .get(parsed.scheme().len()..)
        .is_some_and(|rest| rest.starts_with("://"));
    if !has_authority {
        return Err(invalid());
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() && !parsed.scheme().is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}
