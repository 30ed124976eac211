//! In-memory resource cache
//!
//! This module provides [`ResourceCache`], a thread-safe store with two
//! independent namespaces keyed by the verbatim resource locator:
//!
//! - **Payload**: raw response bytes from the topic endpoint
//! - **Image**: decoded images and cacheable placeholders
//!
//! Entries live until the namespace is cleared. There is no size bound and no
//! expiry.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use topic_fetcher::app::cache::{CacheNamespace, ResourceCache};
//!
//! # async fn example() {
//! let cache = Arc::new(ResourceCache::new());
//!
//! cache
//!     .put_payload("https://api.example.com/topics", Arc::from(&b"{}"[..]))
//!     .await;
//! assert!(cache.contains(CacheNamespace::Payload, "https://api.example.com/topics").await);
//!
//! // Reload path
//! cache.clear(CacheNamespace::Payload).await;
//! # }
//! ```

pub mod manager;
pub mod stats;

// Re-export main public API
pub use manager::{CacheNamespace, Payload, ResourceCache};
pub use stats::CacheStats;
