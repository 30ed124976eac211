//! HTTP transport settings
//!
//! One reqwest client is shared by the payload and image services, so its
//! pool is sized for a burst of small image downloads against a single host.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::constants::{http, limits};
use crate::errors::{ConfigError, ConfigResult, TransportError, TransportResult};

/// Configuration for the HTTP transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Whole-request timeout, body included
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// How long an idle pooled connection is kept (None = forever)
    pub pool_idle_timeout: Option<Duration>,
    /// Idle connections kept per host
    pub pool_max_per_host: usize,
    /// Requests per second across both services
    pub rate_limit_rps: u32,
    /// Treat non-success HTTP statuses as transport errors
    ///
    /// Off by default: the body of an error response is handed to the caller
    /// like any other body, and the image pipeline classifies it as
    /// undecodable.
    pub reject_error_status: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
            reject_error_status: false,
        }
    }
}

impl ClientConfig {
    /// Check the settings before a client is built from them
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero rate limit or a zero
    /// timeout
    pub fn validate(&self) -> ConfigResult<()> {
        if self.rate_limit_rps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "client.rate_limit_rps".to_string(),
                value: "0".to_string(),
                reason: "Rate limit must be positive".to_string(),
            });
        }

        for (field, timeout) in [
            ("client.request_timeout_secs", self.request_timeout),
            ("client.connect_timeout_secs", self.connect_timeout),
        ] {
            if timeout.is_zero() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: "0".to_string(),
                    reason: "Timeout must be at least one second".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Build the shared reqwest client
    pub fn build_http_client(&self) -> TransportResult<Client> {
        let mut builder = Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(http::USER_AGENT)
            .tcp_nodelay(true)
            .pool_max_idle_per_host(self.pool_max_per_host);

        if let Some(idle_timeout) = self.pool_idle_timeout {
            builder = builder.pool_idle_timeout(idle_timeout);
        }

        builder.build().map_err(TransportError::Http)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_pass_error_bodies_through() {
        let config = ClientConfig::default();
        assert!(!config.reject_error_status);
        assert_eq!(config.rate_limit_rps, limits::DEFAULT_RATE_LIMIT_RPS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        let config = ClientConfig {
            rate_limit_rps: 0,
            ..Default::default()
        };
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => {
                assert_eq!(field, "client.rate_limit_rps")
            }
            other => panic!("Expected invalid rate limit, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_connect_timeout_rejected() {
        let config = ClientConfig {
            connect_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "client.connect_timeout_secs"
        ));
    }

    #[test]
    fn test_client_builds_without_idle_timeout() {
        let config = ClientConfig {
            pool_idle_timeout: None,
            reject_error_status: true,
            ..Default::default()
        };
        assert!(config.build_http_client().is_ok());
    }
}
