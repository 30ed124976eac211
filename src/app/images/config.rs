//! Configuration for the image fetch service

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::images;
use crate::errors::{ConfigError, ConfigResult};

/// Runtime configuration for [`ImageFetchService`](super::ImageFetchService)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Prefix joined to every relative image path by plain concatenation
    pub base_host: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_host: images::DEFAULT_BASE_HOST.to_string(),
        }
    }
}

impl ImageConfig {
    /// Create a configuration for the given base host
    pub fn new(base_host: impl Into<String>) -> Self {
        Self {
            base_host: base_host.into(),
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the base host is not an
    /// absolute http(s) URL
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |reason: &str| ConfigError::InvalidValue {
            field: "images.base_host".to_string(),
            value: self.base_host.clone(),
            reason: reason.to_string(),
        };

        let url = Url::parse(&self.base_host).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(invalid("Base host must be an absolute http(s) URL"));
        }
        Ok(())
    }
}
