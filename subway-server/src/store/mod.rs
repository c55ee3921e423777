//! In-memory storage.
//!
//! The stores stand in for a relational backend: they own the records,
//! assign ids, and report every row an edit touched. Handles are cheap to
//! clone and share one underlying state.

mod error;
mod lines;
mod seed;
mod stations;

pub use error::StoreError;
pub use lines::{LineStore, SectionChange};
pub use seed::{SeedError, SeedNetwork, SeedSummary, apply_seed, load_seed};
pub use stations::StationRegistry;
