//! Cache-first payload fetching for the configured endpoint
//!
//! [`FetchService`] fronts exactly one endpoint. The first fetch goes to the
//! network and stores the body in the payload namespace of the shared
//! [`ResourceCache`]; later fetches are served from memory until a reload.

use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use crate::app::cache::{CacheNamespace, Payload, ResourceCache};
use crate::app::client::Transport;
use crate::errors::{ConfigError, ConfigResult, FetchResult};

/// Payload fetcher for a single endpoint
#[derive(Debug, Clone)]
pub struct FetchService {
    endpoint: Url,
    transport: Arc<dyn Transport>,
    cache: Arc<ResourceCache>,
}

impl FetchService {
    /// Create a service for `endpoint`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` for a blank endpoint and
    /// `ConfigError::InvalidValue` if it is not an absolute http(s) URL
    pub fn new(
        endpoint: &str,
        transport: Arc<dyn Transport>,
        cache: Arc<ResourceCache>,
    ) -> ConfigResult<Self> {
        let endpoint = parse_endpoint(endpoint)?;
        info!("Fetch service ready for {}", endpoint);

        Ok(Self {
            endpoint,
            transport,
            cache,
        })
    }

    /// The endpoint this service fetches
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Return the endpoint's payload, from cache when present
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Transport` if the payload is not cached and the
    /// network request fails. Nothing is cached in that case.
    pub async fn fetch(&self) -> FetchResult<Payload> {
        let locator = self.endpoint.as_str();

        if let Some(payload) = self.cache.get_payload(locator).await {
            debug!("Serving {} byte payload from cache", payload.len());
            return Ok(payload);
        }

        let body = self.transport.get(&self.endpoint).await.map_err(|e| {
            warn!("Payload fetch from {} failed: {}", locator, e);
            e
        })?;

        let payload: Payload = Arc::from(body);
        self.cache.put_payload(locator, payload.clone()).await;
        debug!("Fetched {} byte payload from {}", payload.len(), locator);

        Ok(payload)
    }

    /// Clear the payload cache and fetch again from the network
    ///
    /// # Errors
    ///
    /// Same as [`FetchService::fetch`]; the cache stays cleared on failure
    pub async fn reload(&self) -> FetchResult<Payload> {
        info!("Reloading payload from {}", self.endpoint);
        self.clear_cache().await;
        self.fetch().await
    }

    /// Drop every cached payload
    pub async fn clear_cache(&self) {
        self.cache.clear(CacheNamespace::Payload).await;
    }
}

/// Validate an endpoint string as an absolute http(s) URL
pub(crate) fn parse_endpoint(endpoint: &str) -> ConfigResult<Url> {
    let trimmed = endpoint.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingField {
            field: "api.url".to_string(),
        });
    }

    let url = Url::parse(trimmed).map_err(|e| ConfigError::InvalidValue {
        field: "api.url".to_string(),
        value: trimmed.to_string(),
        reason: format!("Not a valid URL: {}", e),
    })?;

    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(ConfigError::InvalidValue {
            field: "api.url".to_string(),
            value: trimmed.to_string(),
            reason: "Endpoint must be an absolute http(s) URL".to_string(),
        }),
    }
}
