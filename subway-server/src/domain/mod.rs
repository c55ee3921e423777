//! Domain types for the subway network.
//!
//! This module contains the core domain model: stations, sections, and
//! the per-line section chain. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity, and every chain edit either applies completely or leaves the
//! chain untouched.

mod chain;
mod connector;
mod error;
mod line;
mod section;
mod station;

pub use chain::{ChainEdit, ChainRemoval, SectionChain};
pub use connector::SectionConnector;
pub use error::SectionError;
pub use line::{Line, LineId};
pub use section::{Section, SectionId, SectionKey};
pub use station::{InvalidName, Station, StationId};
