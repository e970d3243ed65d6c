//! Route resolution caching.
//!
//! [`ResolutionCache`] memoises `path -> Option<RouteMatch>` so repeated
//! navigation to the same page (back/forward, re-render after login) skips
//! the linear pattern scan. It is gated behind the `cache` feature flag and
//! uses the [`lru`] crate internally.
//!
//! Only direct resolutions are cached, misses included. Fallback to the
//! default route is applied after the lookup, so changing the default never
//! requires invalidation. Registering a route clears the whole cache.
//!
//! # Examples
//!
//! ```
//! use vidshare_navigator::cache::ResolutionCache;
//!
//! let mut cache = ResolutionCache::new();
//! assert!(cache.get("/video/1").is_none());
//! cache.insert("/video/1".to_string(), None);
//! assert_eq!(cache.get("/video/1"), Some(None));
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::route::RouteMatch;
use crate::{debug_log, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Counters tracking cache hit/miss rates and invalidations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: usize,
    /// Lookups that had to scan the route table.
    pub misses: usize,
    /// Number of full cache invalidations (via [`ResolutionCache::clear`]).
    pub invalidations: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache for route resolution results.
#[derive(Debug)]
pub struct ResolutionCache {
    entries: LruCache<String, Option<RouteMatch>>,
    stats: CacheStats,
}

impl ResolutionCache {
    const DEFAULT_CAPACITY: usize = 256;

    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache with a custom capacity. Zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Look up a path. The outer `Option` is hit/miss, the inner one is the
    /// cached resolution (a cached `None` means "no pattern matches").
    pub fn get(&mut self, path: &str) -> Option<Option<RouteMatch>> {
        if let Some(entry) = self.entries.get(path) {
            self.stats.hits += 1;
            trace_log!("Resolution cache hit for '{}'", path);
            Some(entry.clone())
        } else {
            self.stats.misses += 1;
            trace_log!("Resolution cache miss for '{}'", path);
            None
        }
    }

    /// Store a resolution.
    pub fn insert(&mut self, path: String, resolution: Option<RouteMatch>) {
        self.entries.push(path, resolution);
    }

    /// Drop every entry and increment the invalidation counter.
    pub fn clear(&mut self) {
        let len = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Resolution cache cleared: {} entries removed ({} total invalidations, hit rate: {:.1}%)",
            len,
            self.stats.invalidations,
            self.stats.hit_rate() * 100.0
        );
    }

    /// Return a reference to the current cache statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new()
    }
}
