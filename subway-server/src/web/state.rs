//! Application state for the web layer.

use std::sync::Arc;

use crate::path::{CacheConfig, RouteService};
use crate::store::{LineStore, StationRegistry};

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Station registry
    pub stations: StationRegistry,

    /// Line store
    pub lines: LineStore,

    /// Cached route queries over the line store
    pub routes: Arc<RouteService>,
}

impl AppState {
    /// Create a new app state.
    ///
    /// The route service is built over a clone of `lines`, so cache
    /// invalidation and line edits always see the same store.
    pub fn new(stations: StationRegistry, lines: LineStore, cache_config: &CacheConfig) -> Self {
        let routes = Arc::new(RouteService::new(lines.clone(), cache_config));
        Self {
            stations,
            lines,
            routes,
        }
    }
}
