//! Core HTTP operations with rate limiting
//!
//! One GET per call, no retries: a failed request is reported to the caller
//! as a `TransportError` and the caller decides what to do with it.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{clock::DefaultClock, state::InMemoryState, Jitter, Quota, RateLimiter};
use reqwest::Client;
use url::Url;

use crate::errors::{TransportError, TransportResult};

/// HTTP operations handler
#[derive(Debug)]
pub struct HttpHandler {
    client: Client,
    rate_limiter: RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>,
    reject_error_status: bool,
}

impl HttpHandler {
    /// Creates a new HttpHandler with the given client and rate limiting
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client to use for requests
    /// * `rate_limit_rps` - Requests per second rate limit
    /// * `reject_error_status` - Whether non-2xx responses become errors
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the rate limit is zero
    pub fn new(
        client: Client,
        rate_limit_rps: u32,
        reject_error_status: bool,
    ) -> TransportResult<Self> {
        let rate_limiter = Self::build_rate_limiter(rate_limit_rps)?;
        Ok(Self {
            client,
            rate_limiter,
            reject_error_status,
        })
    }

    /// Builds the rate limiter with the specified rate limit
    fn build_rate_limiter(
        rate_limit_rps: u32,
    ) -> TransportResult<RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>> {
        let rps = NonZeroU32::new(rate_limit_rps)
            .ok_or_else(|| TransportError::Other("Rate limit must be non-zero".to_string()))?;
        Ok(RateLimiter::direct(Quota::per_second(rps)))
    }

    /// Fetches the full response body
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the request or body read fails, or if the
    /// status is rejected
    pub async fn get_bytes(&self, url: &Url) -> TransportResult<Vec<u8>> {
        // Apply rate limiting with jitter to avoid thundering herd
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(20)))
            .await;

        let response = self.client.get(url.as_str()).send().await.map_err(|e| {
            tracing::warn!("Request to {} failed: {}", url, e);
            TransportError::Http(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            if self.reject_error_status {
                tracing::warn!("Rejecting HTTP {} from {}", status.as_u16(), url);
                return Err(TransportError::ServerError {
                    status: status.as_u16(),
                });
            }
            tracing::debug!("Passing through HTTP {} body from {}", status.as_u16(), url);
        }

        let body = response.bytes().await?;
        tracing::debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }

    /// Get a reference to the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }
}
