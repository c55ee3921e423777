//! In-memory line store.
//!
//! Owns every line and drives chain edits end to end: it resolves the
//! line, applies the edit, and assigns persistence ids to any sections
//! the edit created. Callers get back the full set of touched sections.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{Line, LineId, Section, SectionId, Station, StationId};

use super::error::StoreError;

/// Sections touched by one structural edit, with persistence ids
/// assigned. What a relational backend would write in one transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionChange {
    /// Sections inserted by the edit.
    pub created: Vec<Section>,
    /// Existing sections whose span or distance changed.
    pub updated: Vec<Section>,
    /// Sections deleted by the edit.
    pub removed: Vec<Section>,
}

/// Thread-safe line store.
///
/// Cloning the handle shares the underlying state.
#[derive(Clone, Default)]
pub struct LineStore {
    inner: Arc<RwLock<LinesState>>,
}

#[derive(Default)]
struct LinesState {
    lines: HashMap<LineId, Line>,
    next_line_id: i64,
    next_section_id: i64,
}

impl LineStore {
    /// Create an empty store. Line and section ids are assigned from 1
    /// upwards.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a line around its first section.
    pub async fn create(
        &self,
        name: &str,
        color: &str,
        up: Station,
        down: Station,
        distance: u32,
    ) -> Result<Line, StoreError> {
        let mut guard = self.inner.write().await;
        let state = &mut *guard;

        if state.lines.values().any(|line| line.name() == name) {
            return Err(StoreError::DuplicateLineName(name.to_string()));
        }

        let initial = Section::new(up, down, distance)?;

        let line_id = LineId(state.next_line_id + 1);
        state.next_line_id += 1;
        state.next_section_id += 1;
        let section_id = SectionId(state.next_section_id);

        let mut line = Line::new(line_id, name, color, initial);
        let head = line.chain().head_key();
        line.assign_section_id(head, section_id);

        state.lines.insert(line_id, line.clone());

        debug!(id = %line_id, name, "created line");
        Ok(line)
    }

    /// Look up a line by id.
    pub async fn get(&self, id: LineId) -> Result<Line, StoreError> {
        let state = self.inner.read().await;
        state
            .lines
            .get(&id)
            .cloned()
            .ok_or(StoreError::LineNotFound(id))
    }

    /// All lines, ordered by id.
    pub async fn list(&self) -> Vec<Line> {
        let state = self.inner.read().await;
        let mut lines: Vec<Line> = state.lines.values().cloned().collect();
        lines.sort_by_key(Line::id);
        lines
    }

    /// Replace a line's display name and color.
    pub async fn update_info(
        &self,
        id: LineId,
        name: &str,
        color: &str,
    ) -> Result<Line, StoreError> {
        let mut state = self.inner.write().await;
        let line = state
            .lines
            .get_mut(&id)
            .ok_or(StoreError::LineNotFound(id))?;

        line.update_info(name, color);
        Ok(line.clone())
    }

    /// Delete a line and all its sections.
    pub async fn remove(&self, id: LineId) -> Result<(), StoreError> {
        let mut state = self.inner.write().await;
        state
            .lines
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::LineNotFound(id))
    }

    /// Attach a section to a line.
    ///
    /// On success the created sections carry freshly assigned ids. On
    /// failure nothing changes.
    pub async fn connect_section(
        &self,
        line_id: LineId,
        up: Station,
        down: Station,
        distance: u32,
    ) -> Result<SectionChange, StoreError> {
        let mut guard = self.inner.write().await;
        let state = &mut *guard;

        let line = state
            .lines
            .get_mut(&line_id)
            .ok_or(StoreError::LineNotFound(line_id))?;

        let request = Section::new(up, down, distance)?;
        let edit = line.connect_section(request)?;

        let mut change = SectionChange::default();
        for key in edit.created {
            state.next_section_id += 1;
            line.assign_section_id(key, SectionId(state.next_section_id));
            if let Some(section) = line.section(key) {
                change.created.push(section.clone());
            }
        }
        for key in edit.updated {
            if let Some(section) = line.section(key) {
                change.updated.push(section.clone());
            }
        }

        debug!(
            line = %line_id,
            created = change.created.len(),
            updated = change.updated.len(),
            "attached section"
        );
        Ok(change)
    }

    /// Remove a station from a line.
    ///
    /// Removing an interior station merges its two sections into one,
    /// which shows up in the change set as a creation.
    pub async fn remove_station(
        &self,
        line_id: LineId,
        station: StationId,
    ) -> Result<SectionChange, StoreError> {
        let mut guard = self.inner.write().await;
        let state = &mut *guard;

        let line = state
            .lines
            .get_mut(&line_id)
            .ok_or(StoreError::LineNotFound(line_id))?;

        let removal = line.remove_station(station)?;

        let mut change = SectionChange {
            removed: removal.removed,
            ..SectionChange::default()
        };
        if let Some(key) = removal.merged {
            state.next_section_id += 1;
            line.assign_section_id(key, SectionId(state.next_section_id));
            if let Some(section) = line.section(key) {
                change.created.push(section.clone());
            }
        }

        debug!(
            line = %line_id,
            station = %station,
            removed = change.removed.len(),
            merged = change.created.len(),
            "removed station from line"
        );
        Ok(change)
    }

    /// True if any line's chain touches the station.
    pub async fn any_line_uses(&self, station: StationId) -> bool {
        let state = self.inner.read().await;
        state
            .lines
            .values()
            .any(|line| line.chain().contains_station(station))
    }

    /// Rewrite the station copies line chains hold after a registry
    /// rename. Returns true when any line was touched.
    pub async fn refresh_station(&self, station: &Station) -> bool {
        let mut state = self.inner.write().await;
        let mut touched = false;
        for line in state.lines.values_mut() {
            if line.refresh_station(station) {
                touched = true;
            }
        }
        if touched {
            debug!(station = %station, "refreshed station copies");
        }
        touched
    }

    /// Flat snapshot of every line's sections, grouped by line in travel
    /// order. This is what the route finder builds its graph from.
    pub async fn all_sections(&self) -> Vec<Section> {
        let state = self.inner.read().await;
        let mut ids: Vec<LineId> = state.lines.keys().copied().collect();
        ids.sort_unstable();

        ids.iter()
            .filter_map(|id| state.lines.get(id))
            .flat_map(Line::sections)
            .collect()
    }

    /// Get the number of lines.
    pub async fn len(&self) -> usize {
        let state = self.inner.read().await;
        state.lines.len()
    }

    /// Check if the store is empty.
    pub async fn is_empty(&self) -> bool {
        let state = self.inner.read().await;
        state.lines.is_empty()
    }
}
