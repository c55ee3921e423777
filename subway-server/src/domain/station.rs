//! Station types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a station name fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station name: {reason}")]
pub struct InvalidName {
    reason: &'static str,
}

/// Identity of a station, assigned by the registry.
///
/// Stations are compared by id everywhere: two records with the same id
/// refer to the same station regardless of the name snapshot they carry.
///
/// # Examples
///
/// ```
/// use subway_server::domain::StationId;
///
/// let id = StationId(1);
/// assert_eq!(id.0, 1);
///
/// // StationId is Copy, so it's cheap to pass around
/// let id2 = id;
/// assert_eq!(id, id2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub i64);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for StationId {
    fn from(value: i64) -> Self {
        StationId(value)
    }
}

impl From<StationId> for i64 {
    fn from(value: StationId) -> Self {
        value.0
    }
}

/// A subway station: an id plus a display name.
///
/// The name must contain at least one non-whitespace character and is
/// trimmed on construction. Equality and hashing use the id only, so a
/// station keeps its identity across renames.
///
/// # Examples
///
/// ```
/// use subway_server::domain::{Station, StationId};
///
/// let station = Station::new(StationId(1), "  Gangnam  ").unwrap();
/// assert_eq!(station.name(), "Gangnam");
///
/// // Blank names are rejected
/// assert!(Station::new(StationId(2), "   ").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Station {
    id: StationId,
    name: String,
}

impl Station {
    /// Creates a station, trimming and validating the name.
    pub fn new(id: StationId, name: impl Into<String>) -> Result<Self, InvalidName> {
        let name = name.into();
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(InvalidName {
                reason: "must not be blank",
            });
        }

        Ok(Station {
            id,
            name: trimmed.to_string(),
        })
    }

    /// Returns the station's id.
    pub fn id(&self) -> StationId {
        self.id
    }

    /// Returns the station's display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Station {}

impl std::hash::Hash for Station {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
