//! Core application logic for Topic Fetcher
//!
//! This module contains the fetching subsystem: the HTTP transport, the
//! shared resource cache, the bounded task queue, the payload and image
//! services, and the topic data models.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use topic_fetcher::app::{dedupe, FetchService, HttpClient, ResourceCache, TopicDocument};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = Arc::new(ResourceCache::new());
//! let service = FetchService::new(
//!     "https://api.duckduckgo.com/?q=simpsons+characters&format=json",
//!     Arc::new(HttpClient::new()?),
//!     cache,
//! )?;
//!
//! let payload = service.fetch().await?;
//! let topics = dedupe(&TopicDocument::from_slice(&payload)?.into_records());
//! for topic in &topics {
//!     let (name, description) = topic.name_and_description();
//!     println!("{:?}: {:?}", name, description);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod dedupe;
pub mod fetch;
pub mod images;
pub mod models;
pub mod queue;
pub mod subsystem;

// Re-export main public API
pub use cache::{CacheNamespace, CacheStats, Payload, ResourceCache};
pub use client::{ClientConfig, HttpClient, MockResponse, MockTransport, Transport};
pub use dedupe::{dedupe, Uniqued};
pub use fetch::FetchService;
pub use images::{Image, ImageConfig, ImageFetchService, Placeholder};
pub use models::{extract_name_and_description, Icon, TopicDocument, TopicRecord};
pub use queue::{BoundedTaskQueue, QueueStats, TaskHandle, TaskQueueConfig};
pub use subsystem::{Subsystem, SubsystemConfig, SubsystemStats};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        // Ensure public API is accessible
        let config = ClientConfig::default();
        assert!(!config.reject_error_status);
        assert_eq!(TaskQueueConfig::default().max_concurrent, 5);
    }
}
