//! Per-catalog response cache keyed by query signature, backed by `DashMap`.

use dashmap::DashMap;
use ecovolt_api::types::ProductPage;
use std::time::Duration;
use tokio::time::Instant;

/// How long a cached page may short-circuit a request.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// A cached page with the time it was fetched.
struct CacheEntry {
    page: ProductPage,
    fetched_at: Instant,
}

/// In-memory cache of product pages with a staleness window.
///
/// Stale entries are kept until they are overwritten or the cache is cleared;
/// callers decide with [`is_stale`](Self::is_stale) whether an entry may be used.
/// Uses `tokio`'s clock so a paused test runtime controls staleness.
pub struct ResponseCache {
    store: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl ResponseCache {
    /// Creates an empty cache whose entries go stale after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            store: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached page for `signature`, stale or not.
    pub fn get(&self, signature: &str) -> Option<ProductPage> {
        self.store.get(signature).map(|entry| entry.page.clone())
    }

    /// Returns the cached page only while it is fresh.
    pub fn get_fresh(&self, signature: &str) -> Option<ProductPage> {
        let entry = self.store.get(signature)?;
        if entry.fetched_at.elapsed() > self.ttl {
            return None;
        }
        Some(entry.page.clone())
    }

    /// Inserts or overwrites the entry for `signature`, stamping it with the current time.
    pub fn put(&self, signature: String, page: ProductPage) {
        self.store.insert(
            signature,
            CacheEntry {
                page,
                fetched_at: Instant::now(),
            },
        );
    }

    /// True when there is no entry or it is older than the TTL.
    pub fn is_stale(&self, signature: &str) -> bool {
        match self.store.get(signature) {
            Some(entry) => entry.fetched_at.elapsed() > self.ttl,
            None => true,
        }
    }

    /// Removes all entries along with their timestamps.
    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Cached signatures, sorted for stable output.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.store.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }
}
