//! Cache statistics
//!
//! Hit and miss counters are kept per namespace alongside entry counts so the
//! CLI can report how much network traffic the cache saved.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-namespace hit/miss counters
#[derive(Debug, Default)]
pub(crate) struct HitCounters {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl HitCounters {
    pub(crate) fn record(&self, hit: bool) {
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub(crate) fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached payloads
    pub payload_entries: usize,
    /// Total size of cached payloads in bytes
    pub payload_bytes: u64,
    /// Number of cached images, placeholders included
    pub image_entries: usize,
    /// Number of cached placeholders
    pub placeholder_entries: usize,
    /// Payload lookups answered from cache
    pub payload_hits: u64,
    /// Payload lookups that missed
    pub payload_misses: u64,
    /// Image lookups answered from cache
    pub image_hits: u64,
    /// Image lookups that missed
    pub image_misses: u64,
}

impl CacheStats {
    /// Total number of entries across both namespaces
    pub fn total_entries(&self) -> usize {
        self.payload_entries + self.image_entries
    }

    /// Percentage of image lookups served from cache
    pub fn image_hit_rate(&self) -> f64 {
        let total = self.image_hits + self.image_misses;
        if total == 0 {
            return 0.0;
        }
        (self.image_hits as f64 / total as f64) * 100.0
    }
}
