//! Network-wide route finding.
//!
//! Builds an undirected distance graph from every line's sections and
//! answers shortest-route queries over it, with a cache in front.

mod cache;
mod finder;
mod graph;

pub use cache::{CacheConfig, PathCache, RouteService};
pub use finder::{PathError, PathFinder, RoutePlan, find_path};
pub use graph::NetworkGraph;
