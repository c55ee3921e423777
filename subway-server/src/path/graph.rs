//! Network graph assembly.
//!
//! The route finder works over an undirected weighted graph built from
//! every line's sections. The graph is rebuilt per query from a section
//! snapshot, so it never holds locks and never goes stale.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::warn;

use crate::domain::{Section, Station, StationId};

/// Undirected distance graph over the whole network.
///
/// Sections are traversable in both directions at the same distance. When
/// two lines cover the same station pair with different distances, the
/// smaller distance wins and the conflict is logged.
#[derive(Debug, Clone, Default)]
pub struct NetworkGraph {
    edges: HashMap<StationId, Vec<(StationId, u64)>>,
    stations: HashMap<StationId, Station>,
}

impl NetworkGraph {
    /// Builds the graph from a flat snapshot of sections.
    pub fn build(sections: &[Section]) -> Self {
        let mut weights: HashMap<(StationId, StationId), u64> = HashMap::new();
        let mut stations: HashMap<StationId, Station> = HashMap::new();

        for section in sections {
            let up = section.up_station();
            let down = section.down_station();
            stations.entry(up.id()).or_insert_with(|| up.clone());
            stations.entry(down.id()).or_insert_with(|| down.clone());

            let pair = ordered_pair(up.id(), down.id());
            let weight = u64::from(section.distance());

            match weights.entry(pair) {
                Entry::Vacant(entry) => {
                    entry.insert(weight);
                }
                Entry::Occupied(mut entry) => {
                    if weight != *entry.get() {
                        let kept = weight.min(*entry.get());
                        warn!(
                            a = %pair.0,
                            b = %pair.1,
                            kept,
                            dropped = weight.max(*entry.get()),
                            "conflicting distances for station pair, keeping the smaller"
                        );
                        entry.insert(kept);
                    }
                }
            }
        }

        let mut edges: HashMap<StationId, Vec<(StationId, u64)>> = HashMap::new();
        for ((a, b), weight) in weights {
            edges.entry(a).or_default().push((b, weight));
            edges.entry(b).or_default().push((a, weight));
        }

        // Fixed neighbor order keeps traversals reproducible
        for neighbors in edges.values_mut() {
            neighbors.sort_unstable();
        }

        NetworkGraph { edges, stations }
    }

    /// Returns true if the station touches at least one section.
    pub fn contains(&self, station: StationId) -> bool {
        self.edges.contains_key(&station)
    }

    /// Returns the station's neighbors with their edge weights, sorted by
    /// station id.
    pub fn neighbors(&self, station: StationId) -> &[(StationId, u64)] {
        self.edges
            .get(&station)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the station record behind an id, if it is in the graph.
    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(&id)
    }

    /// Returns the number of stations in the graph.
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }
}

fn ordered_pair(a: StationId, b: StationId) -> (StationId, StationId) {
    if a <= b { (a, b) } else { (b, a) }
}
