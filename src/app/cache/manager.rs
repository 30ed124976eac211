//! Core resource cache
//!
//! Each namespace is its own `RwLock<HashMap>`, so payload and image traffic
//! never contend. Values are reference counted, so a reader holds the lock
//! only long enough to clone an `Arc`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::app::images::Image;

use super::stats::{CacheStats, HitCounters};

/// Raw response bytes shared between the cache and its readers
pub type Payload = Arc<[u8]>;

/// The two independent key spaces of the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheNamespace {
    /// Raw payload bytes
    Payload,
    /// Decoded images and cacheable placeholders
    Image,
}

impl CacheNamespace {
    /// Name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheNamespace::Payload => "payload",
            CacheNamespace::Image => "image",
        }
    }
}

impl fmt::Display for CacheNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thread-safe in-memory cache keyed by resource locator
#[derive(Debug, Default)]
pub struct ResourceCache {
    /// Payload bytes by locator
    payloads: RwLock<HashMap<String, Payload>>,
    /// Images by locator
    images: RwLock<HashMap<String, Image>>,
    payload_counters: HitCounters,
    image_counters: HitCounters,
}

impl ResourceCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a payload
    pub async fn get_payload(&self, locator: &str) -> Option<Payload> {
        let payload = self.payloads.read().await.get(locator).cloned();
        self.payload_counters.record(payload.is_some());
        debug!(
            "Payload cache {} for {}",
            if payload.is_some() { "hit" } else { "miss" },
            locator
        );
        payload
    }

    /// Store a payload, replacing any previous value for the locator
    pub async fn put_payload(&self, locator: impl Into<String>, payload: Payload) {
        let locator = locator.into();
        debug!("Caching {} byte payload for {}", payload.len(), locator);
        self.payloads.write().await.insert(locator, payload);
    }

    /// Look up an image
    pub async fn get_image(&self, locator: &str) -> Option<Image> {
        let image = self.images.read().await.get(locator).cloned();
        self.image_counters.record(image.is_some());
        debug!(
            "Image cache {} for {}",
            if image.is_some() { "hit" } else { "miss" },
            locator
        );
        image
    }

    /// Store an image, replacing any previous value for the locator
    pub async fn put_image(&self, locator: impl Into<String>, image: Image) {
        let locator = locator.into();
        debug!("Caching {} for {}", image, locator);
        self.images.write().await.insert(locator, image);
    }

    /// Check whether a locator has an entry in a namespace
    pub async fn contains(&self, namespace: CacheNamespace, locator: &str) -> bool {
        match namespace {
            CacheNamespace::Payload => self.payloads.read().await.contains_key(locator),
            CacheNamespace::Image => self.images.read().await.contains_key(locator),
        }
    }

    /// Number of entries in a namespace
    pub async fn len(&self, namespace: CacheNamespace) -> usize {
        match namespace {
            CacheNamespace::Payload => self.payloads.read().await.len(),
            CacheNamespace::Image => self.images.read().await.len(),
        }
    }

    /// Whether both namespaces are empty
    pub async fn is_empty(&self) -> bool {
        self.payloads.read().await.is_empty() && self.images.read().await.is_empty()
    }

    /// Remove every entry from a namespace
    ///
    /// # Returns
    ///
    /// The number of entries removed
    pub async fn clear(&self, namespace: CacheNamespace) -> usize {
        let removed = match namespace {
            CacheNamespace::Payload => {
                let mut payloads = self.payloads.write().await;
                let count = payloads.len();
                payloads.clear();
                count
            }
            CacheNamespace::Image => {
                let mut images = self.images.write().await;
                let count = images.len();
                images.clear();
                count
            }
        };

        info!("Cleared {} {} cache entries", removed, namespace);
        removed
    }

    /// Remove every entry from both namespaces
    pub async fn clear_all(&self) {
        self.clear(CacheNamespace::Payload).await;
        self.clear(CacheNamespace::Image).await;
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        let (payload_entries, payload_bytes) = {
            let payloads = self.payloads.read().await;
            let bytes = payloads.values().map(|p| p.len() as u64).sum();
            (payloads.len(), bytes)
        };
        let (image_entries, placeholder_entries) = {
            let images = self.images.read().await;
            let placeholders = images.values().filter(|i| i.is_placeholder()).count();
            (images.len(), placeholders)
        };

        CacheStats {
            payload_entries,
            payload_bytes,
            image_entries,
            placeholder_entries,
            payload_hits: self.payload_counters.hits(),
            payload_misses: self.payload_counters.misses(),
            image_hits: self.image_counters.hits(),
            image_misses: self.image_counters.misses(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::images::types::fixtures::png_bytes;
    use crate::app::images::Placeholder;

    const LOCATOR: &str = "https://api.example.com/?q=topics&format=json";

    fn payload(bytes: &[u8]) -> Payload {
        Arc::from(bytes)
    }

    #[tokio::test]
    async fn test_payload_roundtrip_and_overwrite() {
        let cache = ResourceCache::new();
        assert!(cache.get_payload(LOCATOR).await.is_none());

        cache.put_payload(LOCATOR, payload(b"first")).await;
        assert_eq!(&*cache.get_payload(LOCATOR).await.unwrap(), b"first");

        cache.put_payload(LOCATOR, payload(b"second")).await;
        assert_eq!(&*cache.get_payload(LOCATOR).await.unwrap(), b"second");
        assert_eq!(cache.len(CacheNamespace::Payload).await, 1);
    }

    #[tokio::test]
    async fn test_locators_are_not_normalized() {
        let cache = ResourceCache::new();
        cache
            .put_payload("https://example.com/a", payload(b"a"))
            .await;

        assert!(cache.get_payload("https://example.com/a/").await.is_none());
        assert!(cache.get_payload("HTTPS://example.com/a").await.is_none());
        assert!(cache.get_payload("https://example.com/a").await.is_some());
    }

    #[tokio::test]
    async fn test_namespaces_are_independent() {
        let cache = ResourceCache::new();
        cache.put_payload(LOCATOR, payload(b"bytes")).await;
        cache
            .put_image(LOCATOR, Image::Placeholder(Placeholder::TransportError))
            .await;

        assert!(cache.contains(CacheNamespace::Payload, LOCATOR).await);
        assert!(cache.contains(CacheNamespace::Image, LOCATOR).await);

        let removed = cache.clear(CacheNamespace::Payload).await;
        assert_eq!(removed, 1);
        assert!(!cache.contains(CacheNamespace::Payload, LOCATOR).await);
        assert!(cache.contains(CacheNamespace::Image, LOCATOR).await);

        cache.clear_all().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_stats() {
        let cache = ResourceCache::new();
        cache.put_payload(LOCATOR, payload(b"12345")).await;
        cache
            .put_image(
                "https://example.com/a.png",
                Image::decode(&png_bytes(2, 2)).unwrap(),
            )
            .await;
        cache
            .put_image(
                "https://example.com/b.png",
                Image::Placeholder(Placeholder::TransportError),
            )
            .await;

        cache.get_payload(LOCATOR).await;
        cache.get_image("https://example.com/a.png").await;
        cache.get_image("https://example.com/missing.png").await;

        let stats = cache.stats().await;
        assert_eq!(stats.payload_entries, 1);
        assert_eq!(stats.payload_bytes, 5);
        assert_eq!(stats.image_entries, 2);
        assert_eq!(stats.placeholder_entries, 1);
        assert_eq!(stats.payload_hits, 1);
        assert_eq!(stats.image_hits, 1);
        assert_eq!(stats.image_misses, 1);
        assert_eq!(stats.total_entries(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_and_readers() {
        let cache = Arc::new(ResourceCache::new());
        let old = payload(&[1u8; 64]);
        let new = payload(&[2u8; 64]);
        cache.put_payload(LOCATOR, old.clone()).await;

        let mut handles = Vec::new();
        for i in 0..32 {
            let cache = Arc::clone(&cache);
            let old = old.clone();
            let new = new.clone();
            handles.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    cache.put_payload(LOCATOR, new).await;
                } else {
                    // Readers see a whole old or whole new value, never a mix
                    let seen = cache.get_payload(LOCATOR).await.unwrap();
                    assert!(seen == old || seen == new);
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(cache.get_payload(LOCATOR).await.unwrap(), new);
    }
}
