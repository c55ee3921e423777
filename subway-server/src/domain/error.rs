//! Domain error types.
//!
//! These errors represent rejected chain edits and validation failures in
//! the domain layer. They are distinct from storage and web errors.

use super::StationId;

/// Errors raised while validating sections or editing a line's chain.
///
/// A rejected edit leaves the chain exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SectionError {
    /// A section's two endpoints are the same station
    #[error("a section cannot join station {station} to itself")]
    SameStation { station: StationId },

    /// A section's distance is below the minimum
    #[error("section distance must be at least 1, got {distance}")]
    InvalidDistance { distance: u32 },

    /// Neither endpoint of the request lines up anywhere on the chain
    #[error("section {up} -> {down} does not attach to the line anywhere")]
    Unconnectable { up: StationId, down: StationId },

    /// Both endpoints of the request are already on the chain
    #[error("stations {up} and {down} are both already on the line")]
    DuplicateConnection { up: StationId, down: StationId },

    /// A splitting request is at least as long as the section it splits
    #[error("cannot split a section of distance {existing} with a span of distance {requested}")]
    DistanceTooLarge { requested: u32, existing: u32 },

    /// Merging two adjacent sections would exceed the maximum distance
    #[error("merging sections of distance {above} and {below} exceeds the maximum span")]
    DistanceOverflow { above: u32, below: u32 },

    /// The chain has a single section, so there is nothing past the head
    /// to disconnect
    #[error("the line has no section below its head to disconnect")]
    NoDownSection,

    /// The station to remove is not on the chain
    #[error("station {station} is not on the line")]
    StationNotInLine { station: StationId },

    /// Removing the station would leave the line without any section
    #[error("a line must keep at least one section")]
    LastSection,
}
