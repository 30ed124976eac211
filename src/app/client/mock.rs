//! Scripted in-memory transport
//!
//! `MockTransport` answers GET requests from a table of canned responses and
//! counts every call, which makes cache-first behaviour observable without a
//! network. It is public so integration tests can use it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::errors::{TransportError, TransportResult};

use super::Transport;

/// Canned response for one locator
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Successful response with this body
    Body(Vec<u8>),
    /// Transport failure with this message
    Fail(String),
}

/// Transport double with per-locator responses and call counting
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, MockResponse>>,
    fallback: Option<MockResponse>,
    delay: Option<Duration>,
    calls: Mutex<HashMap<String, usize>>,
    total_calls: AtomicUsize,
}

impl MockTransport {
    /// Create a transport where unknown locators fail
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every unknown locator with `response`
    pub fn with_fallback(mut self, response: MockResponse) -> Self {
        self.fallback = Some(response);
        self
    }

    /// Sleep this long inside every request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the response for a locator
    pub fn respond(&self, locator: &str, response: MockResponse) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.insert(locator.to_string(), response);
        }
    }

    /// Builder form of [`respond`](Self::respond)
    pub fn with_response(self, locator: &str, response: MockResponse) -> Self {
        self.respond(locator, response);
        self
    }

    /// Number of requests made for a locator
    pub fn calls_for(&self, locator: &str) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.get(locator).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Number of requests made in total
    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &Url) -> TransportResult<Vec<u8>> {
        let locator = url.as_str();
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut calls) = self.calls.lock() {
            *calls.entry(locator.to_string()).or_insert(0) += 1;
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let response = self
            .responses
            .lock()
            .ok()
            .and_then(|responses| responses.get(locator).cloned())
            .or_else(|| self.fallback.clone());

        match response {
            Some(MockResponse::Body(body)) => Ok(body),
            Some(MockResponse::Fail(message)) => Err(TransportError::Other(message)),
            None => Err(TransportError::Other(format!(
                "no scripted response for {}",
                locator
            ))),
        }
    }
}
