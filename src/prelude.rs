//! Prelude module for Topic Fetcher Library
//!
//! This module re-exports the most commonly used items from the library,
//! providing a convenient way to import everything needed for typical usage
//! with a single `use topic_fetcher::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use topic_fetcher::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::load(None).await?;
//!     let subsystem = Subsystem::assemble(config.to_runtime_config()?)?;
//!
//!     for topic in subsystem.load_topics(false).await? {
//!         let image = subsystem.images().fetch_image(topic.image_path()).await;
//!         println!("{:?} {}", topic.name_and_description().0, image);
//!     }
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Essential app components that are used in most integrations
pub use crate::app::{
    // Data types
    dedupe,
    extract_name_and_description,
    // Shared components
    BoundedTaskQueue,
    CacheNamespace,
    ClientConfig,
    FetchService,
    HttpClient,
    Image,
    ImageConfig,
    ImageFetchService,
    Placeholder,
    ResourceCache,
    // Wiring
    Subsystem,
    SubsystemConfig,
    TaskQueueConfig,
    TopicDocument,
    TopicRecord,
    Transport,
    Uniqued,
};

pub use crate::config::AppConfig;

// Commonly used constants
pub use crate::constants::{DEFAULT_BASE_HOST, DEFAULT_MAX_CONCURRENT, USER_AGENT};

// Standard library re-exports that are commonly needed
pub use std::sync::Arc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        let _client_config = ClientConfig::default();
        let _image_config = ImageConfig::default();
        assert_eq!(TaskQueueConfig::default().max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert!(USER_AGENT.contains("Topic-Fetcher"));
    }

    #[tokio::test]
    async fn test_prelude_integration_pattern() {
        let cache = Arc::new(ResourceCache::new());
        let queue = BoundedTaskQueue::new(DEFAULT_MAX_CONCURRENT).unwrap();
        let transport: Arc<dyn Transport> = Arc::new(crate::app::MockTransport::new());

        let images = ImageFetchService::new(
            ImageConfig::default(),
            transport,
            Arc::clone(&cache),
            queue,
        )
        .unwrap();

        let image = images.fetch_image("").await;
        assert_eq!(image.placeholder(), Some(Placeholder::InvalidLocator));
        assert!(cache.is_empty().await);
    }
}
