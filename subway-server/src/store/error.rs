//! Store error types.

use crate::domain::{InvalidName, LineId, SectionError, StationId};

/// Errors raised by the in-memory stores.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No station is registered under the id
    #[error("station {0} not found")]
    StationNotFound(StationId),

    /// No line is registered under the id
    #[error("line {0} not found")]
    LineNotFound(LineId),

    /// Another station already uses the name
    #[error("a station named \"{0}\" is already registered")]
    DuplicateStationName(String),

    /// Another line already uses the name
    #[error("a line named \"{0}\" is already registered")]
    DuplicateLineName(String),

    /// The station name failed validation
    #[error(transparent)]
    InvalidName(#[from] InvalidName),

    /// The domain rejected a section or a chain edit
    #[error(transparent)]
    Section(#[from] SectionError),
}
