//! Caching layer for route queries.
//!
//! A route depends on the structure of every line, so the whole cache is
//! dropped whenever any line changes. The TTL bounds staleness in case an
//! invalidation is ever missed.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::StationId;
use crate::store::LineStore;

use super::finder::{PathError, PathFinder, RoutePlan};

/// Cache key for a route query. Keys are directional: a route and its
/// reverse are distinct entries.
type RouteKey = (StationId, StationId);

/// Cached route entry.
type RouteEntry = Arc<RoutePlan>;

/// Configuration for the route cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
        }
    }
}

/// Cache for computed routes.
pub struct PathCache {
    routes: MokaCache<RouteKey, RouteEntry>,
}

impl PathCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { routes }
    }

    /// Get a cached route.
    pub async fn get(&self, key: &RouteKey) -> Option<RouteEntry> {
        self.routes.get(key).await
    }

    /// Insert a route into the cache.
    pub async fn insert(&self, key: RouteKey, entry: RouteEntry) {
        self.routes.insert(key, entry).await;
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.routes.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.routes.invalidate_all();
    }
}

/// Route queries with caching.
///
/// Wraps the line store and caches computed routes. Anything that changes
/// line structure must call [`RouteService::invalidate`] afterwards.
pub struct RouteService {
    lines: LineStore,
    cache: PathCache,
}

impl RouteService {
    /// Create a new route service over the given store.
    pub fn new(lines: LineStore, cache_config: &CacheConfig) -> Self {
        Self {
            lines,
            cache: PathCache::new(cache_config),
        }
    }

    /// Find the shortest route between two stations, using the cache if
    /// possible.
    pub async fn find(
        &self,
        source: StationId,
        target: StationId,
    ) -> Result<RouteEntry, PathError> {
        let key = (source, target);

        // Try cache first
        if let Some(cached) = self.cache.get(&key).await {
            debug!(%source, %target, "route cache hit");
            return Ok(cached);
        }

        // Compute over a fresh section snapshot
        let sections = self.lines.all_sections().await;
        let plan = PathFinder::new(&sections).find(source, target)?;

        // Cache and return
        let entry = Arc::new(plan);
        self.cache.insert(key, entry.clone()).await;

        Ok(entry)
    }

    /// Drop every cached route. Called after any line edit.
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }

    /// Get cache statistics.
    pub fn cached_routes(&self) -> u64 {
        self.cache.entry_count()
    }
}
