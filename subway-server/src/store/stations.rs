//! In-memory station registry.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{Station, StationId};

use super::error::StoreError;

/// Thread-safe station registry.
///
/// Owns the station records and assigns ids. Cloning the handle shares
/// the underlying state.
#[derive(Clone, Default)]
pub struct StationRegistry {
    inner: Arc<RwLock<RegistryState>>,
}

#[derive(Default)]
struct RegistryState {
    stations: HashMap<StationId, Station>,
    next_id: i64,
}

impl StationRegistry {
    /// Create an empty registry. Ids are assigned from 1 upwards.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new station under the next free id.
    ///
    /// The name is trimmed before the duplicate check, so two names that
    /// differ only in surrounding whitespace collide.
    pub async fn register(&self, name: &str) -> Result<Station, StoreError> {
        let mut state = self.inner.write().await;
        let trimmed = name.trim();

        if state.stations.values().any(|s| s.name() == trimmed) {
            return Err(StoreError::DuplicateStationName(trimmed.to_string()));
        }

        // The id is only consumed once validation has passed
        let id = StationId(state.next_id + 1);
        let station = Station::new(id, trimmed)?;
        state.next_id += 1;
        state.stations.insert(id, station.clone());

        debug!(%id, name = station.name(), "registered station");
        Ok(station)
    }

    /// Look up a station by id.
    pub async fn get(&self, id: StationId) -> Result<Station, StoreError> {
        let state = self.inner.read().await;
        state
            .stations
            .get(&id)
            .cloned()
            .ok_or(StoreError::StationNotFound(id))
    }

    /// All registered stations, ordered by id.
    pub async fn list(&self) -> Vec<Station> {
        let state = self.inner.read().await;
        let mut stations: Vec<Station> = state.stations.values().cloned().collect();
        stations.sort_by_key(Station::id);
        stations
    }

    /// Replace a station's name, keeping its id.
    pub async fn rename(&self, id: StationId, name: &str) -> Result<Station, StoreError> {
        let mut state = self.inner.write().await;

        if !state.stations.contains_key(&id) {
            return Err(StoreError::StationNotFound(id));
        }

        let station = Station::new(id, name)?;
        state.stations.insert(id, station.clone());

        debug!(%id, name = station.name(), "renamed station");
        Ok(station)
    }

    /// Remove a station from the registry.
    ///
    /// The registry does not know which lines use the station; callers
    /// that care must check the line store first.
    pub async fn remove(&self, id: StationId) -> Result<(), StoreError> {
        let mut state = self.inner.write().await;
        state
            .stations
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::StationNotFound(id))
    }

    /// Get the number of registered stations.
    pub async fn len(&self) -> usize {
        let state = self.inner.read().await;
        state.stations.len()
    }

    /// Check if the registry is empty.
    pub async fn is_empty(&self) -> bool {
        let state = self.inner.read().await;
        state.stations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_assigns_sequential_ids() {
        let registry = StationRegistry::new();

        let first = registry.register("Gangnam").await.unwrap();
        let second = registry.register("Yeoksam").await.unwrap();

        assert_eq!(first.id(), StationId(1));
        assert_eq!(second.id(), StationId(2));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_names() {
        let registry = StationRegistry::new();
        registry.register("Gangnam").await.unwrap();

        let err = registry.register("Gangnam").await.unwrap_err();
        assert_eq!(err, StoreError::DuplicateStationName("Gangnam".into()));
    }

    #[tokio::test]
    async fn duplicate_check_ignores_surrounding_whitespace() {
        let registry = StationRegistry::new();
        registry.register("Gangnam").await.unwrap();

        assert!(registry.register("  Gangnam  ").await.is_err());
    }

    #[tokio::test]
    async fn rejected_names_do_not_burn_ids() {
        let registry = StationRegistry::new();

        assert!(registry.register("   ").await.is_err());
        let station = registry.register("Gangnam").await.unwrap();

        assert_eq!(station.id(), StationId(1));
    }

    #[tokio::test]
    async fn get_returns_registered_station() {
        let registry = StationRegistry::new();
        let station = registry.register("Gangnam").await.unwrap();

        let found = registry.get(station.id()).await.unwrap();
        assert_eq!(found.name(), "Gangnam");
    }

    #[tokio::test]
    async fn get_unknown_id_fails() {
        let registry = StationRegistry::new();

        let err = registry.get(StationId(9)).await.unwrap_err();
        assert_eq!(err, StoreError::StationNotFound(StationId(9)));
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let registry = StationRegistry::new();
        registry.register("C").await.unwrap();
        registry.register("A").await.unwrap();
        registry.register("B").await.unwrap();

        let names: Vec<_> = registry
            .list()
            .await
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, ["C", "A", "B"]);
    }

    #[tokio::test]
    async fn rename_keeps_id() {
        let registry = StationRegistry::new();
        let station = registry.register("Gangnam").await.unwrap();

        let renamed = registry.rename(station.id(), "Gangnam Express").await.unwrap();

        assert_eq!(renamed.id(), station.id());
        assert_eq!(renamed.name(), "Gangnam Express");
        assert_eq!(registry.get(station.id()).await.unwrap().name(), "Gangnam Express");
    }

    #[tokio::test]
    async fn rename_unknown_id_fails() {
        let registry = StationRegistry::new();

        let err = registry.rename(StationId(9), "Nowhere").await.unwrap_err();
        assert_eq!(err, StoreError::StationNotFound(StationId(9)));
    }

    #[tokio::test]
    async fn remove_deletes_the_record() {
        let registry = StationRegistry::new();
        let station = registry.register("Gangnam").await.unwrap();

        registry.remove(station.id()).await.unwrap();

        assert!(registry.get(station.id()).await.is_err());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn removed_ids_are_not_reused() {
        let registry = StationRegistry::new();
        let first = registry.register("Gangnam").await.unwrap();
        registry.remove(first.id()).await.unwrap();

        let second = registry.register("Yeoksam").await.unwrap();
        assert_eq!(second.id(), StationId(2));
    }

    #[tokio::test]
    async fn handles_share_state() {
        let registry = StationRegistry::new();
        let other = registry.clone();

        registry.register("Gangnam").await.unwrap();

        assert_eq!(other.len().await, 1);
    }
}
