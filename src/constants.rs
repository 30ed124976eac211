//! Application constants for Topic Fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain.

use std::time::Duration;

/// Environment variable names
pub mod env {
    /// Overrides the configured API endpoint
    pub const API_URL: &str = "TOPIC_FETCHER_API_URL";

    /// Overrides the configured image base host
    pub const IMAGE_HOST: &str = "TOPIC_FETCHER_IMAGE_HOST";

    /// Overrides the configured image queue capacity
    pub const MAX_CONCURRENT: &str = "TOPIC_FETCHER_MAX_CONCURRENT";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "Topic-Fetcher/0.1.0";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum idle connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 8;
}

/// Rate limiting
pub mod limits {
    /// Default rate limit for outgoing requests (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 20;
}

/// Bounded task queue defaults
pub mod queue {
    use super::Duration;

    /// Maximum number of concurrently executing image downloads
    pub const DEFAULT_MAX_CONCURRENT: usize = 5;

    /// Upper bound on how long one task may hold an admission slot
    pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(60);
}

/// Image service defaults
pub mod images {
    /// Host prefixed to every relative image path
    pub const DEFAULT_BASE_HOST: &str = "https://duckduckgo.com/";
}

/// Payload schema constants
pub mod topics {
    /// Delimiter separating a topic's name from its description
    pub const NAME_DESCRIPTION_DELIMITER: &str = " - ";
}

/// Configuration file locations
pub mod config {
    /// Application directory name under the user config directory
    pub const APP_DIR_NAME: &str = "topic-fetcher";

    /// Config file name
    pub const FILE_NAME: &str = "config.toml";

    /// Project-local config file name
    pub const LOCAL_FILE_NAME: &str = "topic-fetcher.toml";
}

// Re-export commonly used constants at the top level
pub use http::USER_AGENT;
pub use images::DEFAULT_BASE_HOST;
pub use queue::DEFAULT_MAX_CONCURRENT;
