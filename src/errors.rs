//! Error types for Topic Fetcher
//!
//! Each concern gets its own error enum so callers can match on exactly the
//! failures a component can produce. [`AppError`] unifies them for the CLI.
//!
//! The image pipeline is deliberately absent here: it degrades every failure
//! to a placeholder image instead of returning an error.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Failed to serialize configuration")]
    Serialize(#[from] toml::ser::Error),

    /// Missing required configuration field
    #[error("Missing required configuration field: {field}")]
    MissingField { field: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// User configuration directory could not be determined
    #[error("Could not determine user config directory")]
    NoConfigDirectory,
}

/// Transport-level failures reported by a [`Transport`](crate::app::client::Transport)
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error status and status rejection is enabled
    #[error("Server error: HTTP {status}")]
    ServerError { status: u16 },

    /// Locator could not be turned into a request
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Any other transport failure (used by non-HTTP transports)
    #[error("{0}")]
    Other(String),
}

/// Payload fetch errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network/transport failure while fetching the endpoint
    #[error("Failed to fetch payload")]
    Transport(#[from] TransportError),
}

/// Topic document decoding errors
#[derive(Error, Debug)]
pub enum DecodeError {
    /// JSON parsing error
    #[error("Failed to decode topic document")]
    Json(#[from] serde_json::Error),
}

/// Bounded task queue errors
#[derive(Error, Debug)]
pub enum QueueError {
    /// Queue constructed with a capacity of zero
    #[error("Invalid queue capacity: {capacity}. At least one concurrent task is required")]
    InvalidCapacity { capacity: usize },

    /// The admission semaphore was closed
    #[error("Task queue is closed")]
    Closed,

    /// Submitted work panicked
    #[error("Task panicked: {message}")]
    TaskPanicked { message: String },

    /// Submitted work exceeded the configured task timeout
    #[error("Task timeout after {millis} ms")]
    TaskTimeout { millis: u64 },

    /// Task was aborted before it completed
    #[error("Task was cancelled")]
    TaskCancelled,
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Payload fetch error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Decoding error
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Queue error
    #[error(transparent)]
    Queue(#[from] QueueError),

    /// Transport error raised outside a fetch (e.g. client construction)
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is recoverable (transient)
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Fetch(FetchError::Transport(TransportError::Http(_)))
            | AppError::Fetch(FetchError::Transport(TransportError::ServerError { .. }))
            | AppError::Transport(TransportError::Http(_))
            | AppError::Queue(QueueError::TaskTimeout { .. }) => true,

            AppError::Config(_) | AppError::Decode(_) => false,

            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config",
            AppError::Fetch(_) => "fetch",
            AppError::Decode(_) => "decode",
            AppError::Queue(_) => "queue",
            AppError::Transport(_) => "transport",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Transport result type alias
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Decode result type alias
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Queue result type alias
pub type QueueResult<T> = std::result::Result<T, QueueError>;
