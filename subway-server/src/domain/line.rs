//! Line types.
//!
//! A `Line` is a named, colored route owning one [`SectionChain`]. All
//! structural edits go through the line so callers never touch the chain
//! of another line by mistake.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::chain::{ChainEdit, ChainRemoval, SectionChain};
use super::error::SectionError;
use super::section::{Section, SectionId, SectionKey};
use super::station::{Station, StationId};

/// Identity of a line, assigned by the line store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub i64);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A subway line: display info plus the chain of sections it runs over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    id: LineId,
    name: String,
    color: String,
    chain: SectionChain,
}

impl Line {
    /// Creates a line around its first section.
    pub fn new(
        id: LineId,
        name: impl Into<String>,
        color: impl Into<String>,
        initial: Section,
    ) -> Self {
        Line {
            id,
            name: name.into(),
            color: color.into(),
            chain: SectionChain::new(initial),
        }
    }

    /// Returns the line's id.
    pub fn id(&self) -> LineId {
        self.id
    }

    /// Returns the line's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the line's display color.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Replaces the line's display name and color.
    pub fn update_info(&mut self, name: impl Into<String>, color: impl Into<String>) {
        self.name = name.into();
        self.color = color.into();
    }

    /// Read access to the underlying chain.
    pub fn chain(&self) -> &SectionChain {
        &self.chain
    }

    /// Attaches a section to the line. See [`SectionChain::connect`].
    pub fn connect_section(&mut self, request: Section) -> Result<ChainEdit, SectionError> {
        self.chain.connect(request)
    }

    /// Removes a station from the line. See [`SectionChain::remove_station`].
    pub fn remove_station(&mut self, station: StationId) -> Result<ChainRemoval, SectionError> {
        self.chain.remove_station(station)
    }

    /// Sets the persistence id of the section at `key`.
    pub fn assign_section_id(&mut self, key: SectionKey, id: SectionId) {
        self.chain.assign_section_id(key, id);
    }

    /// Rewrites stored copies of a renamed station. See
    /// [`SectionChain::refresh_station`].
    pub fn refresh_station(&mut self, station: &Station) -> bool {
        self.chain.refresh_station(station)
    }

    /// Returns the section at `key`, if it is live.
    pub fn section(&self, key: SectionKey) -> Option<&Section> {
        self.chain.section(key)
    }

    /// Returns copies of the line's sections in travel order.
    pub fn sections(&self) -> Vec<Section> {
        self.chain.sections_in_order()
    }

    /// Returns the stations the line visits, up terminal first.
    pub fn stations(&self) -> Vec<Station> {
        self.chain.stations_in_order()
    }
}
