//! Section types.
//!
//! A `Section` is one stop-to-stop span of a line with a travel distance.
//! A `SectionKey` addresses a section's slot inside its line's chain and
//! stays stable for the lifetime of the line.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::SectionError;
use super::station::{Station, StationId};

/// Persistence id of a section, assigned by the line store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub i64);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Slot address of a section within one line's chain.
///
/// Keys are handed out by the chain when sections are created and remain
/// valid until the line is dropped. A key is not a persistence id and is
/// meaningless outside the chain that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionKey(pub(crate) usize);

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One span of a subway line: an up station, a down station, and the
/// distance between them.
///
/// The two stations must differ and the distance must be at least
/// [`Section::MIN_DISTANCE`]. The persistence id starts out unset and is
/// filled in by the store once the section is accepted onto a line.
///
/// # Examples
///
/// ```
/// use subway_server::domain::{Section, Station, StationId};
///
/// let gangnam = Station::new(StationId(1), "Gangnam").unwrap();
/// let yeoksam = Station::new(StationId(2), "Yeoksam").unwrap();
///
/// let section = Section::new(gangnam.clone(), yeoksam, 10).unwrap();
/// assert_eq!(section.distance(), 10);
/// assert!(section.id().is_none());
///
/// // A section cannot loop back to its own up station
/// let loopback = Station::new(StationId(1), "Gangnam").unwrap();
/// assert!(Section::new(gangnam, loopback, 10).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    id: Option<SectionId>,
    up_station: Station,
    down_station: Station,
    distance: u32,
}

impl Section {
    /// Smallest distance a section may span.
    pub const MIN_DISTANCE: u32 = 1;

    /// Creates a section, validating its endpoints and distance.
    pub fn new(
        up_station: Station,
        down_station: Station,
        distance: u32,
    ) -> Result<Self, SectionError> {
        if up_station.id() == down_station.id() {
            return Err(SectionError::SameStation {
                station: up_station.id(),
            });
        }

        if distance < Self::MIN_DISTANCE {
            return Err(SectionError::InvalidDistance { distance });
        }

        Ok(Section {
            id: None,
            up_station,
            down_station,
            distance,
        })
    }

    /// Returns this section with the given persistence id set.
    pub fn with_id(mut self, id: SectionId) -> Self {
        self.id = Some(id);
        self
    }

    pub(super) fn assign_id(&mut self, id: SectionId) {
        self.id = Some(id);
    }

    /// Replaces whichever endpoints match `station` by id.
    ///
    /// Sections hold station copies; the registry owns the names. Swapping
    /// in a same-id station cannot break the distinct-endpoints invariant.
    pub(super) fn refresh_station(&mut self, station: &Station) {
        if self.up_station.id() == station.id() {
            self.up_station = station.clone();
        }
        if self.down_station.id() == station.id() {
            self.down_station = station.clone();
        }
    }

    /// Returns the persistence id, if one has been assigned.
    pub fn id(&self) -> Option<SectionId> {
        self.id
    }

    /// Returns the station this section starts from.
    pub fn up_station(&self) -> &Station {
        &self.up_station
    }

    /// Returns the station this section ends at.
    pub fn down_station(&self) -> &Station {
        &self.down_station
    }

    /// Returns the travel distance between the two stations.
    pub fn distance(&self) -> u32 {
        self.distance
    }

    /// Returns true if either endpoint is the given station.
    pub fn joins(&self, station: StationId) -> bool {
        self.up_station.id() == station || self.down_station.id() == station
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({})",
            self.up_station.name(),
            self.down_station.name(),
            self.distance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: i64, name: &str) -> Station {
        Station::new(StationId(id), name).unwrap()
    }

    #[test]
    fn new_valid_section() {
        let section = Section::new(station(1, "Gangnam"), station(2, "Yeoksam"), 10).unwrap();

        assert_eq!(section.up_station().id(), StationId(1));
        assert_eq!(section.down_station().id(), StationId(2));
        assert_eq!(section.distance(), 10);
        assert!(section.id().is_none());
    }

    #[test]
    fn reject_same_station() {
        let err = Section::new(station(1, "Gangnam"), station(1, "Gangnam"), 10).unwrap_err();
        assert_eq!(
            err,
            SectionError::SameStation {
                station: StationId(1)
            }
        );
    }

    #[test]
    fn same_station_check_uses_id_not_name() {
        // Different names, same id: still the same station
        let err = Section::new(station(1, "Gangnam"), station(1, "Renamed"), 10).unwrap_err();
        assert_eq!(
            err,
            SectionError::SameStation {
                station: StationId(1)
            }
        );
    }

    #[test]
    fn reject_zero_distance() {
        let err = Section::new(station(1, "Gangnam"), station(2, "Yeoksam"), 0).unwrap_err();
        assert_eq!(err, SectionError::InvalidDistance { distance: 0 });
    }

    #[test]
    fn min_distance_is_accepted() {
        let section = Section::new(
            station(1, "Gangnam"),
            station(2, "Yeoksam"),
            Section::MIN_DISTANCE,
        )
        .unwrap();
        assert_eq!(section.distance(), 1);
    }

    #[test]
    fn with_id_sets_persistence_id() {
        let section = Section::new(station(1, "Gangnam"), station(2, "Yeoksam"), 10)
            .unwrap()
            .with_id(SectionId(7));
        assert_eq!(section.id(), Some(SectionId(7)));
    }

    #[test]
    fn refresh_station_replaces_matching_endpoint() {
        let mut section = Section::new(station(1, "Gangnam"), station(2, "Yeoksam"), 10).unwrap();
        section.refresh_station(&station(1, "Renamed"));

        assert_eq!(section.up_station().name(), "Renamed");
        assert_eq!(section.down_station().name(), "Yeoksam");
    }

    #[test]
    fn joins_matches_either_endpoint() {
        let section = Section::new(station(1, "Gangnam"), station(2, "Yeoksam"), 10).unwrap();

        assert!(section.joins(StationId(1)));
        assert!(section.joins(StationId(2)));
        assert!(!section.joins(StationId(3)));
    }

    #[test]
    fn display_shows_span() {
        let section = Section::new(station(1, "Gangnam"), station(2, "Yeoksam"), 10).unwrap();
        assert_eq!(section.to_string(), "Gangnam -> Yeoksam (10)");
    }
}
