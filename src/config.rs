//! Configuration management for Topic Fetcher
//!
//! This module provides unified configuration management with first-run
//! initialization, multi-source loading, and zero-config defaults for
//! everything except the API endpoint.
//!
//! Precedence, lowest to highest: built-in defaults, the config file, then
//! environment variables (a `.env` file is loaded by the binary).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::{ClientConfig, ImageConfig, SubsystemConfig, TaskQueueConfig};
use crate::constants::{config as files, env, http, images, limits, queue};
use crate::errors::{ConfigError, ConfigResult, Result};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Topic endpoint settings
    pub api: ApiConfigToml,
    /// Image service settings
    pub images: ImagesConfigToml,
    /// Image download queue settings
    pub queue: QueueConfigToml,
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Topic endpoint configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfigToml {
    /// Absolute http(s) URL of the topic document
    pub url: Option<String>,
}

/// TOML-friendly image service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfigToml {
    /// Prefix joined to relative image paths
    pub base_host: String,
}

impl Default for ImagesConfigToml {
    fn default() -> Self {
        Self {
            base_host: images::DEFAULT_BASE_HOST.to_string(),
        }
    }
}

/// TOML-friendly queue configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfigToml {
    /// Maximum concurrent image downloads
    pub max_concurrent: usize,
    /// Per-download time limit, e.g. "60s" (absent = unbounded)
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub task_timeout: Option<Duration>,
}

impl Default for QueueConfigToml {
    fn default() -> Self {
        Self {
            max_concurrent: queue::DEFAULT_MAX_CONCURRENT,
            task_timeout: Some(queue::DEFAULT_TASK_TIMEOUT),
        }
    }
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Connection pool idle timeout in seconds (None = no timeout)
    pub pool_idle_timeout_secs: Option<u64>,
    /// Maximum idle connections per host
    pub pool_max_per_host: usize,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
    /// Treat HTTP error statuses as transport failures
    pub reject_error_status: bool,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            pool_idle_timeout_secs: Some(http::POOL_IDLE_TIMEOUT.as_secs()),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
            reject_error_status: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
    /// Enable colored output
    pub colored_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            colored_output: true,
        }
    }
}

impl AppConfig {
    /// Convert TOML-friendly configuration to the subsystem's runtime config
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if no API URL is configured
    pub fn to_runtime_config(&self) -> ConfigResult<SubsystemConfig> {
        let endpoint = self
            .api
            .url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                field: "api.url".to_string(),
            })?;

        Ok(SubsystemConfig {
            endpoint,
            images: self.images.to_runtime_config(),
            queue: self.queue.to_runtime_config(),
            client: self.client.to_runtime_config(),
        })
    }

    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Config file (if exists)
    /// 3. Environment variables
    pub async fn load(config_file_override: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::default();

        // Try to load from config file
        let config_path = if let Some(ref path) = config_file_override {
            Some(path.clone())
        } else {
            Self::find_config_file()
        };

        if let Some(path) = config_path {
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                config = Self::load_from_file(&path).await?;
            } else if config_file_override.is_some() {
                return Err(ConfigError::NotFound { path }.into());
            }
        }

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if an override cannot be parsed
    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(env::API_URL) {
            debug!("API URL overridden by {}", env::API_URL);
            self.api.url = Some(url);
        }

        if let Some(host) = lookup(env::IMAGE_HOST) {
            debug!("Image host overridden by {}", env::IMAGE_HOST);
            self.images.base_host = host;
        }

        if let Some(value) = lookup(env::MAX_CONCURRENT) {
            self.queue.max_concurrent =
                value
                    .trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                        field: env::MAX_CONCURRENT.to_string(),
                        value: value.clone(),
                        reason: e.to_string(),
                    })?;
            debug!(
                "Queue capacity overridden by {}: {}",
                env::MAX_CONCURRENT,
                self.queue.max_concurrent
            );
        }

        Ok(())
    }

    /// Validate settings that would otherwise fail later at assembly
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero queue capacity, a zero
    /// rate limit or a non-absolute image base host
    pub fn validate(&self) -> ConfigResult<()> {
        if self.queue.max_concurrent == 0 {
            return Err(ConfigError::InvalidValue {
                field: "queue.max_concurrent".to_string(),
                value: "0".to_string(),
                reason: "At least one concurrent download is required".to_string(),
            });
        }

        self.client.to_runtime_config().validate()?;
        self.images.to_runtime_config().validate()
    }

    /// Initialize configuration on first run
    ///
    /// Creates a default config file if none exists and notifies the user
    pub async fn initialize_first_run() -> Result<Option<PathBuf>> {
        let config_path = Self::get_default_config_path()?;

        if config_path.exists() {
            return Ok(Some(config_path));
        }

        info!("Creating default configuration file...");
        Self::write_default_config(&config_path, false).await?;

        println!("📁 Created default configuration file:");
        println!("   {}", config_path.display());
        println!("   Set [api] url to the topic endpoint before fetching.");
        println!();

        Ok(Some(config_path))
    }

    /// Write the commented default configuration to `path`
    ///
    /// Refuses to replace an existing file unless `overwrite` is set.
    pub async fn write_default_config(path: &Path, overwrite: bool) -> Result<()> {
        if path.exists() && !overwrite {
            return Err(ConfigError::InvalidValue {
                field: "path".to_string(),
                value: path.display().to_string(),
                reason: "File already exists (use --force to overwrite)".to_string(),
            }
            .into());
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(path, Self::generate_default_config_content()).await?;
        info!("Wrote default configuration to {}", path.display());
        Ok(())
    }

    /// Serialize the resolved configuration as TOML
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![
            // Project-local config
            PathBuf::from(format!("./{}", files::LOCAL_FILE_NAME)),
            PathBuf::from(format!("./{}", files::FILE_NAME)),
        ];

        // User config
        if let Ok(path) = Self::get_default_config_path() {
            search_paths.push(path);
        }

        // System config (Unix only)
        #[cfg(unix)]
        search_paths.push(
            PathBuf::from("/etc")
                .join(files::APP_DIR_NAME)
                .join(files::FILE_NAME),
        );

        for path in search_paths {
            if path.exists() {
                debug!("Found config file: {}", path.display());
                return Some(path);
            }
        }

        debug!("No config file found in standard locations");
        None
    }

    /// Get the default config file path for the current user
    pub fn get_default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDirectory)?;
        Ok(config_dir.join(files::APP_DIR_NAME).join(files::FILE_NAME))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> Result<Self> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                })?;

        let config: AppConfig = toml::from_str(&content).map_err(ConfigError::from)?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Generate default configuration content with helpful comments
    fn generate_default_config_content() -> String {
        format!(
            r#"# Topic Fetcher Configuration
# You can customize any of these settings to suit your needs.
# Environment variables {api_env}, {host_env} and
# {max_env} override the matching settings below.

[api]
# Endpoint serving the topic document (required)
url = "https://api.duckduckgo.com/?q=simpsons+characters&format=json"

[images]
# Prefix joined to each relative image path, no separator added
base_host = "{base_host}"

[queue]
# Maximum number of image downloads in flight at once
max_concurrent = {max_concurrent}
# Upper bound on one download, remove to disable
task_timeout = "{task_timeout}s"

[client]
# HTTP client settings
pool_idle_timeout_secs = {pool_idle}
pool_max_per_host = {pool_max}
request_timeout_secs = {request_timeout}
connect_timeout_secs = {connect_timeout}
rate_limit_rps = {rate_limit}
# Treat HTTP error statuses as failures instead of passing the body on
reject_error_status = false

[logging]
# Logging configuration
level = "warn"  # error, warn, info, debug, trace
colored_output = true
"#,
            api_env = env::API_URL,
            host_env = env::IMAGE_HOST,
            max_env = env::MAX_CONCURRENT,
            base_host = images::DEFAULT_BASE_HOST,
            max_concurrent = queue::DEFAULT_MAX_CONCURRENT,
            task_timeout = queue::DEFAULT_TASK_TIMEOUT.as_secs(),
            pool_idle = http::POOL_IDLE_TIMEOUT.as_secs(),
            pool_max = http::POOL_MAX_PER_HOST,
            request_timeout = http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout = http::CONNECT_TIMEOUT.as_secs(),
            rate_limit = limits::DEFAULT_RATE_LIMIT_RPS,
        )
    }
}

impl ImagesConfigToml {
    /// Convert to runtime ImageConfig
    pub fn to_runtime_config(&self) -> ImageConfig {
        ImageConfig::new(self.base_host.clone())
    }
}

impl QueueConfigToml {
    /// Convert to runtime TaskQueueConfig
    pub fn to_runtime_config(&self) -> TaskQueueConfig {
        TaskQueueConfig {
            max_concurrent: self.max_concurrent,
            task_timeout: self.task_timeout,
        }
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ClientConfig {
        ClientConfig {
            pool_idle_timeout: self.pool_idle_timeout_secs.map(Duration::from_secs),
            pool_max_per_host: self.pool_max_per_host,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            rate_limit_rps: self.rate_limit_rps,
            reject_error_status: self.reject_error_status,
        }
    }
}
