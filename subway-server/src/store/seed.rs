//! Seed fixtures for development and demos.
//!
//! Loads a JSON description of a network and replays it through the
//! registry and line store, so a freshly started server can come up with
//! data instead of empty stores.
//!
//! The format mirrors the creation API: stations are registered first,
//! then each line is created from its first section and grown one
//! section at a time.
//!
//! ```json
//! {
//!   "stations": [{ "name": "강남" }, { "name": "신도림" }],
//!   "lines": [
//!     {
//!       "name": "2호선",
//!       "color": "green",
//!       "sections": [{ "up": "강남", "down": "신도림", "distance": 10 }]
//!     }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::domain::Station;

use super::error::StoreError;
use super::lines::LineStore;
use super::stations::StationRegistry;

/// Errors raised while loading a seed file.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// The seed file could not be read
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    /// The seed file is not valid JSON for the seed format
    #[error("failed to parse seed file: {0}")]
    Json(#[from] serde_json::Error),

    /// A section references a station the seed never declared
    #[error("seed section references unknown station \"{0}\"")]
    UnknownStation(String),

    /// A line carries no sections at all
    #[error("seed line \"{0}\" has no sections")]
    EmptyLine(String),

    /// The stores rejected part of the seed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Root of the seed file.
#[derive(Debug, Deserialize)]
pub struct SeedNetwork {
    #[serde(default)]
    pub stations: Vec<SeedStation>,
    #[serde(default)]
    pub lines: Vec<SeedLine>,
}

#[derive(Debug, Deserialize)]
pub struct SeedStation {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SeedLine {
    pub name: String,
    pub color: String,
    pub sections: Vec<SeedSection>,
}

/// A section referencing its endpoints by seeded station name.
#[derive(Debug, Deserialize)]
pub struct SeedSection {
    pub up: String,
    pub down: String,
    pub distance: u32,
}

/// Counts of what a seed load created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub stations: usize,
    pub lines: usize,
    pub sections: usize,
}

/// Load a seed file and replay it into the given stores.
pub async fn load_seed(
    path: impl AsRef<Path>,
    stations: &StationRegistry,
    lines: &LineStore,
) -> Result<SeedSummary, SeedError> {
    let json = std::fs::read_to_string(path.as_ref())?;
    let network: SeedNetwork = serde_json::from_str(&json)?;
    let summary = apply_seed(&network, stations, lines).await?;

    info!(
        path = %path.as_ref().display(),
        stations = summary.stations,
        lines = summary.lines,
        sections = summary.sections,
        "seed loaded"
    );
    Ok(summary)
}

/// Replay an already parsed seed into the given stores.
///
/// Stations are registered first so lines can reference them by name.
/// Sections within a line are connected in declaration order, so each one
/// must attach to the part of the line built so far.
pub async fn apply_seed(
    network: &SeedNetwork,
    stations: &StationRegistry,
    lines: &LineStore,
) -> Result<SeedSummary, SeedError> {
    let mut by_name: HashMap<String, Station> = HashMap::new();
    let mut summary = SeedSummary::default();

    for seed in &network.stations {
        let station = stations.register(&seed.name).await?;
        by_name.insert(station.name().to_string(), station);
        summary.stations += 1;
    }

    for line in &network.lines {
        let mut sections = line.sections.iter();
        let Some(first) = sections.next() else {
            return Err(SeedError::EmptyLine(line.name.clone()));
        };

        let up = lookup(&by_name, &first.up)?;
        let down = lookup(&by_name, &first.down)?;
        let created = lines
            .create(&line.name, &line.color, up, down, first.distance)
            .await?;
        summary.sections += 1;

        for section in sections {
            let up = lookup(&by_name, &section.up)?;
            let down = lookup(&by_name, &section.down)?;
            lines
                .connect_section(created.id(), up, down, section.distance)
                .await?;
            summary.sections += 1;
        }

        summary.lines += 1;
    }

    Ok(summary)
}

fn lookup(by_name: &HashMap<String, Station>, name: &str) -> Result<Station, SeedError> {
    by_name
        .get(name)
        .cloned()
        .ok_or_else(|| SeedError::UnknownStation(name.to_string()))
}
