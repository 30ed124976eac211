//! Network transport for payload and image downloads
//!
//! Services talk to the network through the [`Transport`] trait so that the
//! caching and admission logic can be exercised against a scripted transport.
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: Core HTTP operations with rate limiting
//! - `mock`: Scripted transport with call counting

use std::fmt::Debug;

use async_trait::async_trait;
use url::Url;

use crate::errors::TransportResult;

// Module declarations
pub mod config;
pub mod http;
pub mod mock;

pub use config::ClientConfig;
pub use mock::{MockResponse, MockTransport};

use http::HttpHandler;

/// HTTP(S) GET capability consumed by the fetch services
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Fetch the full body behind a locator
    ///
    /// # Errors
    ///
    /// Returns `TransportError` when no body could be obtained
    async fn get(&self, url: &Url) -> TransportResult<Vec<u8>>;
}

/// reqwest-backed transport
#[derive(Debug)]
pub struct HttpClient {
    http_handler: HttpHandler,
}

impl HttpClient {
    /// Creates a new HttpClient with default configuration
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if HTTP client creation fails
    pub fn new() -> TransportResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a new HttpClient with custom configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Client configuration settings
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if HTTP client creation fails or the rate
    /// limit is zero
    pub fn with_config(config: ClientConfig) -> TransportResult<Self> {
        let client = config.build_http_client()?;
        let http_handler =
            HttpHandler::new(client, config.rate_limit_rps, config.reject_error_status)?;

        tracing::debug!(
            "Created HTTP client: rate_limit={}rps, timeout={:?}",
            config.rate_limit_rps,
            config.request_timeout
        );

        Ok(Self { http_handler })
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn get(&self, url: &Url) -> TransportResult<Vec<u8>> {
        self.http_handler.get_bytes(url).await
    }
}
