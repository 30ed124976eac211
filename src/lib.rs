//! Topic Fetcher Library
//!
//! Fetches a JSON topic document from a configured endpoint, caches it in
//! memory, and downloads each topic's image through a bounded task queue that
//! never runs more than N downloads at once.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
