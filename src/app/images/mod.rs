//! Image retrieval with placeholder fallback
//!
//! [`ImageFetchService`] turns a relative image path into an [`Image`]. Real
//! downloads are admitted through the shared
//! [`BoundedTaskQueue`](crate::app::queue::BoundedTaskQueue) and cached in
//! the image namespace of the [`ResourceCache`](crate::app::cache::ResourceCache).
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use topic_fetcher::app::{BoundedTaskQueue, HttpClient, ImageConfig, ImageFetchService, ResourceCache};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = ImageFetchService::new(
//!     ImageConfig::default(),
//!     Arc::new(HttpClient::new()?),
//!     Arc::new(ResourceCache::new()),
//!     BoundedTaskQueue::new(5)?,
//! )?;
//!
//! let image = service.fetch_image("i/99b04638.png").await;
//! println!("Got {}", image);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod service;
pub mod types;

pub use config::ImageConfig;
pub use service::ImageFetchService;
pub use types::{Image, Placeholder};
