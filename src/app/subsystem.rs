//! Assembly of the fetching subsystem
//!
//! One [`Subsystem`] owns one [`ResourceCache`] and one [`BoundedTaskQueue`]
//! and hands them to both services. Nothing is global: two assembled
//! subsystems share no state.
//!
//! # Examples
//!
//! ```rust,no_run
//! use topic_fetcher::app::{Subsystem, SubsystemConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SubsystemConfig::new("https://api.duckduckgo.com/?q=simpsons+characters&format=json");
//! let subsystem = Subsystem::assemble(config)?;
//!
//! let topics = subsystem.load_topics(false).await?;
//! for topic in &topics {
//!     let image = subsystem.images().fetch_image(topic.image_path()).await;
//!     println!("{:?}: {}", topic.name_and_description().0, image);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::cache::{CacheStats, ResourceCache};
use crate::app::client::{ClientConfig, HttpClient, Transport};
use crate::app::dedupe::dedupe;
use crate::app::fetch::FetchService;
use crate::app::images::{ImageConfig, ImageFetchService};
use crate::app::models::{TopicDocument, TopicRecord};
use crate::app::queue::{BoundedTaskQueue, QueueStats, TaskQueueConfig};
use crate::errors::Result;

/// Everything needed to assemble a [`Subsystem`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubsystemConfig {
    /// Endpoint serving the topic document
    pub endpoint: String,
    /// Image service settings
    pub images: ImageConfig,
    /// Admission queue settings for image downloads
    pub queue: TaskQueueConfig,
    /// HTTP transport settings
    pub client: ClientConfig,
}

impl SubsystemConfig {
    /// Default settings for the given endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }
}

/// Point-in-time view of the shared components
#[derive(Debug, Clone)]
pub struct SubsystemStats {
    /// Cache occupancy and hit counters
    pub cache: CacheStats,
    /// Queue admission counters
    pub queue: QueueStats,
}

/// Wired-up payload and image services sharing one cache and queue
#[derive(Debug, Clone)]
pub struct Subsystem {
    cache: Arc<ResourceCache>,
    queue: BoundedTaskQueue,
    fetch: FetchService,
    images: ImageFetchService,
}

impl Subsystem {
    /// Assemble with the reqwest transport
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or any component
    /// configuration is invalid
    pub fn assemble(config: SubsystemConfig) -> Result<Self> {
        let transport = HttpClient::with_config(config.client.clone())?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Assemble around a caller-supplied transport
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an invalid endpoint or base host and
    /// `QueueError::InvalidCapacity` for a zero queue capacity
    pub fn with_transport(config: SubsystemConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let cache = Arc::new(ResourceCache::new());
        let queue = BoundedTaskQueue::with_config(config.queue)?;

        let fetch = FetchService::new(&config.endpoint, Arc::clone(&transport), Arc::clone(&cache))?;
        let images =
            ImageFetchService::new(config.images, transport, Arc::clone(&cache), queue.clone())?;

        info!("Subsystem assembled (queue capacity {})", queue.capacity());

        Ok(Self {
            cache,
            queue,
            fetch,
            images,
        })
    }

    /// Payload service
    pub fn fetch(&self) -> &FetchService {
        &self.fetch
    }

    /// Image service
    pub fn images(&self) -> &ImageFetchService {
        &self.images
    }

    /// Shared cache
    pub fn cache(&self) -> &Arc<ResourceCache> {
        &self.cache
    }

    /// Shared admission queue
    pub fn queue(&self) -> &BoundedTaskQueue {
        &self.queue
    }

    /// Fetch, decode and deduplicate the topic list
    ///
    /// With `reload` the payload cache is cleared first.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the payload cannot be obtained and
    /// `DecodeError` if it is not a valid topic document
    pub async fn load_topics(&self, reload: bool) -> Result<Vec<TopicRecord>> {
        let payload = if reload {
            self.fetch.reload().await?
        } else {
            self.fetch.fetch().await?
        };

        let records = TopicDocument::from_slice(&payload)?.into_records();
        let unique = dedupe(&records);
        debug!(
            "Decoded {} topics ({} after deduplication)",
            records.len(),
            unique.len()
        );

        Ok(unique)
    }

    /// Empty both cache namespaces
    pub async fn clear_caches(&self) {
        self.cache.clear_all().await;
    }

    /// Current cache and queue statistics
    pub async fn stats(&self) -> SubsystemStats {
        SubsystemStats {
            cache: self.cache.stats().await,
            queue: self.queue.stats(),
        }
    }
}
