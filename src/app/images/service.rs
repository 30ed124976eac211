//! Image fetching through the bounded task queue
//!
//! The request path for one image:
//! 1. build the locator (base host + relative path) and parse it
//! 2. serve from the image cache if present
//! 3. join an in-flight download of the same locator, or start one
//! 4. download and decode inside a queue task
//! 5. cache decoded images and transport-error placeholders
//!
//! Every path ends in an [`Image`]; callers never see an error.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use tracing::{debug, info, warn};
use url::Url;

use crate::app::cache::ResourceCache;
use crate::app::client::Transport;
use crate::app::queue::BoundedTaskQueue;
use crate::errors::ConfigResult;

use super::config::ImageConfig;
use super::types::{Image, Placeholder};

type InFlight = Arc<Mutex<HashMap<String, Shared<BoxFuture<'static, Image>>>>>;

/// Queue-limited, cache-backed image fetcher
#[derive(Clone)]
pub struct ImageFetchService {
    config: ImageConfig,
    transport: Arc<dyn Transport>,
    cache: Arc<ResourceCache>,
    queue: BoundedTaskQueue,
    in_flight: InFlight,
}

impl ImageFetchService {
    /// Create an image service
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the base host is not an
    /// absolute http(s) URL
    pub fn new(
        config: ImageConfig,
        transport: Arc<dyn Transport>,
        cache: Arc<ResourceCache>,
        queue: BoundedTaskQueue,
    ) -> ConfigResult<Self> {
        config.validate()?;
        info!(
            "Image service ready: base_host={}, max_concurrent={}",
            config.base_host,
            queue.capacity()
        );

        Ok(Self {
            config,
            transport,
            cache,
            queue,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Queue the downloads run on
    pub fn queue(&self) -> &BoundedTaskQueue {
        &self.queue
    }

    /// Full locator for a relative image path
    ///
    /// Plain concatenation: no separator is inserted or removed.
    pub fn locator_for(&self, relative_path: &str) -> String {
        format!("{}{}", self.config.base_host, relative_path)
    }

    /// Number of distinct downloads currently in flight
    pub fn in_flight(&self) -> usize {
        lock(&self.in_flight).len()
    }

    /// Fetch the image for a relative path
    ///
    /// Resolves to a decoded image or a placeholder. Requests for a locator
    /// whose download is already running share that download. Dropping the
    /// returned future does not cancel the download; its result is still
    /// cached for the next request.
    pub async fn fetch_image(&self, relative_path: &str) -> Image {
        if relative_path.trim().is_empty() {
            debug!("Empty image path, using placeholder");
            return Placeholder::InvalidLocator.into();
        }

        let locator = self.locator_for(relative_path);
        let url = match Url::parse(&locator) {
            Ok(url) => url,
            Err(e) => {
                debug!("Invalid image locator {}: {}", locator, e);
                return Placeholder::InvalidLocator.into();
            }
        };

        if let Some(image) = self.cache.get_image(&locator).await {
            return image;
        }

        let download = {
            let mut in_flight = lock(&self.in_flight);
            match in_flight.get(&locator) {
                Some(existing) => {
                    debug!("Joining in-flight download of {}", locator);
                    existing.clone()
                }
                None => {
                    let task = tokio::spawn(self.download(locator.clone(), url));
                    let task_locator = locator.clone();
                    let download = async move {
                        task.await.unwrap_or_else(|e| {
                            warn!("Image download task for {} ended: {}", task_locator, e);
                            Placeholder::TransportError.into()
                        })
                    }
                    .boxed()
                    .shared();
                    in_flight.insert(locator, download.clone());
                    download
                }
            }
        };

        download.await
    }

    /// Download, decode and cache one locator as a queue task
    ///
    /// The returned future is spawned, so the download keeps its place in
    /// the queue and finishes even when every requester has gone away.
    fn download(
        &self,
        locator: String,
        url: Url,
    ) -> impl Future<Output = Image> + Send + 'static {
        let transport = Arc::clone(&self.transport);
        let cache = Arc::clone(&self.cache);
        let queue = self.queue.clone();
        let in_flight = Arc::clone(&self.in_flight);

        async move {
            // Built inside the task so the map is only touched once it runs
            let entry = InFlightEntry {
                in_flight,
                locator: locator.clone(),
            };
            let task_locator = locator.clone();
            let outcome = queue
                .run(async move {
                    download_and_decode(transport.as_ref(), &task_locator, &url).await
                })
                .await;

            let image = match outcome {
                Ok(image) => {
                    if is_cacheable(&image) {
                        cache.put_image(locator.as_str(), image.clone()).await;
                    }
                    image
                }
                Err(e) => {
                    warn!("Image task for {} failed: {}", locator, e);
                    Placeholder::TransportError.into()
                }
            };

            drop(entry);
            image
        }
    }
}

impl fmt::Debug for ImageFetchService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFetchService")
            .field("config", &self.config)
            .field("transport", &self.transport)
            .field("queue", &self.queue)
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

/// Body of a queue task: transport GET followed by decoding
async fn download_and_decode(transport: &dyn Transport, locator: &str, url: &Url) -> Image {
    let bytes = match transport.get(url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Image download from {} failed: {}", locator, e);
            return Placeholder::TransportError.into();
        }
    };

    match Image::decode(&bytes) {
        Ok(image) => {
            debug!("Decoded {} from {}", image, locator);
            image
        }
        Err(e) => {
            debug!(
                "Response from {} is not an image ({} bytes): {}",
                locator,
                bytes.len(),
                e
            );
            Placeholder::Undecodable.into()
        }
    }
}

fn is_cacheable(image: &Image) -> bool {
    match image {
        Image::Decoded(_) => true,
        Image::Placeholder(kind) => kind.is_cacheable(),
    }
}

/// Removes a locator from the in-flight map when its download task ends
struct InFlightEntry {
    in_flight: InFlight,
    locator: String,
}

impl Drop for InFlightEntry {
    fn drop(&mut self) {
        lock(&self.in_flight).remove(&self.locator);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
