//! Shortest-path search over the network graph.
//!
//! Uses Dijkstra's algorithm with a min-heap keyed on (distance, station
//! id). Relaxation is strict, so the first route settled at a station
//! survives later equal-cost arrivals; keying the heap on the id as well
//! fixes the visit order, so equal-cost ties resolve the same way on
//! every run.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use tracing::debug;

use crate::domain::{Section, Station, StationId};

use super::graph::NetworkGraph;

/// Errors raised by a route query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Source and target are the same station
    #[error("source and target stations are the same")]
    SameStation,

    /// The station exists but no section touches it
    #[error("station {0} is not connected to the network")]
    StationNotInNetwork(StationId),

    /// Both stations are in the network but no route joins them
    #[error("no route exists between station {from} and station {to}")]
    NoPathExists { from: StationId, to: StationId },
}

/// A computed route: the stations visited in order plus the summed
/// distance of the edges between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePlan {
    pub stations: Vec<Station>,
    pub total_distance: u64,
}

/// Shortest-path engine over one section snapshot.
pub struct PathFinder {
    graph: NetworkGraph,
}

impl PathFinder {
    /// Builds a finder over a snapshot of every line's sections.
    pub fn new(sections: &[Section]) -> Self {
        PathFinder {
            graph: NetworkGraph::build(sections),
        }
    }

    /// Read access to the underlying graph.
    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    /// Finds the shortest route from `source` to `target`.
    pub fn find(&self, source: StationId, target: StationId) -> Result<RoutePlan, PathError> {
        if source == target {
            return Err(PathError::SameStation);
        }
        if !self.graph.contains(source) {
            return Err(PathError::StationNotInNetwork(source));
        }
        if !self.graph.contains(target) {
            return Err(PathError::StationNotInNetwork(target));
        }

        let mut best: HashMap<StationId, u64> = HashMap::new();
        let mut previous: HashMap<StationId, StationId> = HashMap::new();
        let mut heap = BinaryHeap::new();

        best.insert(source, 0);
        heap.push(Reverse((0u64, source)));

        while let Some(Reverse((distance, at))) = heap.pop() {
            // Stale entry: a shorter route to this station was already
            // settled
            if best.get(&at).is_some_and(|&d| distance > d) {
                continue;
            }
            if at == target {
                break;
            }

            for &(next, weight) in self.graph.neighbors(at) {
                let candidate = distance + weight;
                if best.get(&next).is_none_or(|&d| candidate < d) {
                    best.insert(next, candidate);
                    previous.insert(next, at);
                    heap.push(Reverse((candidate, next)));
                }
            }
        }

        let Some(&total_distance) = best.get(&target) else {
            return Err(PathError::NoPathExists {
                from: source,
                to: target,
            });
        };

        // Walk the predecessor tree back from the target
        let mut ids = vec![target];
        let mut cursor = target;
        while let Some(&back) = previous.get(&cursor) {
            ids.push(back);
            cursor = back;
        }
        ids.reverse();

        let stations = ids
            .iter()
            .filter_map(|id| self.graph.station(*id).cloned())
            .collect();

        debug!(
            %source,
            %target,
            total_distance,
            stops = ids.len(),
            "route found"
        );

        Ok(RoutePlan {
            stations,
            total_distance,
        })
    }
}

/// Builds the graph and answers a single query.
pub fn find_path(
    sections: &[Section],
    source: StationId,
    target: StationId,
) -> Result<RoutePlan, PathError> {
    PathFinder::new(sections).find(source, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Section;

    fn station(id: i64, name: &str) -> Station {
        Station::new(StationId(id), name).unwrap()
    }

    fn section(up: &Station, down: &Station, distance: u32) -> Section {
        Section::new(up.clone(), down.clone(), distance).unwrap()
    }

    fn ids(plan: &RoutePlan) -> Vec<i64> {
        plan.stations.iter().map(|s| s.id().0).collect()
    }

    #[test]
    fn finds_route_across_two_lines() {
        // Two lines sharing 신도림: one covers 신도림 <-> 부천, the other
        // 강남 <-> 신도림. 잠실 exists but touches no section.
        let gangnam = station(1, "강남");
        let sindorim = station(2, "신도림");
        let bucheon = station(3, "부천");

        let sections = vec![
            section(&sindorim, &bucheon, 5),
            section(&gangnam, &sindorim, 10),
        ];

        let plan = find_path(&sections, StationId(1), StationId(3)).unwrap();

        assert_eq!(ids(&plan), [1, 2, 3]);
        assert_eq!(plan.total_distance, 15);

        let names: Vec<_> = plan.stations.iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, ["강남", "신도림", "부천"]);
    }

    #[test]
    fn unlinked_station_is_not_in_network() {
        let gangnam = station(1, "강남");
        let sindorim = station(2, "신도림");
        let jamsil = station(4, "잠실");

        // 잠실 is registered but no section touches it
        let sections = vec![section(&gangnam, &sindorim, 10)];

        let err = find_path(&sections, StationId(1), jamsil.id()).unwrap_err();
        assert_eq!(err, PathError::StationNotInNetwork(StationId(4)));
    }

    #[test]
    fn same_station_is_rejected_before_lookup() {
        // Rejected even when the station is unknown to the graph
        let err = find_path(&[], StationId(9), StationId(9)).unwrap_err();
        assert_eq!(err, PathError::SameStation);
    }

    #[test]
    fn disconnected_components_have_no_path() {
        let a = station(1, "A");
        let b = station(2, "B");
        let c = station(3, "C");
        let d = station(4, "D");

        let sections = vec![section(&a, &b, 5), section(&c, &d, 5)];

        let err = find_path(&sections, StationId(1), StationId(3)).unwrap_err();
        assert_eq!(
            err,
            PathError::NoPathExists {
                from: StationId(1),
                to: StationId(3)
            }
        );
    }

    #[test]
    fn picks_shorter_of_two_routes() {
        // 1 -> 2 -> 4 costs 6, 1 -> 3 -> 4 costs 9
        let s1 = station(1, "S1");
        let s2 = station(2, "S2");
        let s3 = station(3, "S3");
        let s4 = station(4, "S4");

        let sections = vec![
            section(&s1, &s2, 3),
            section(&s2, &s4, 3),
            section(&s1, &s3, 4),
            section(&s3, &s4, 5),
        ];

        let plan = find_path(&sections, StationId(1), StationId(4)).unwrap();

        assert_eq!(ids(&plan), [1, 2, 4]);
        assert_eq!(plan.total_distance, 6);
    }

    #[test]
    fn sections_are_traversable_backwards() {
        let a = station(1, "A");
        let b = station(2, "B");
        let c = station(3, "C");

        let sections = vec![section(&a, &b, 5), section(&b, &c, 5)];

        // Query against the travel direction of both sections
        let plan = find_path(&sections, StationId(3), StationId(1)).unwrap();

        assert_eq!(ids(&plan), [3, 2, 1]);
        assert_eq!(plan.total_distance, 10);
    }

    #[test]
    fn equal_cost_routes_resolve_deterministically() {
        // A diamond with equal costs: 1 -> 2 -> 4 and 1 -> 3 -> 4 both
        // cost 10. The heap visits station 2 first, so its route wins,
        // and it wins on every run
        let s1 = station(1, "S1");
        let s2 = station(2, "S2");
        let s3 = station(3, "S3");
        let s4 = station(4, "S4");

        let sections = vec![
            section(&s1, &s3, 5),
            section(&s3, &s4, 5),
            section(&s1, &s2, 5),
            section(&s2, &s4, 5),
        ];

        let plan = find_path(&sections, StationId(1), StationId(4)).unwrap();
        assert_eq!(ids(&plan), [1, 2, 4]);
    }

    #[test]
    fn first_settled_route_wins_equal_cost_ties() {
        // 1 -> 3 -> 4 and 1 -> 2 -> 4 both cost 4. Station 4 is reached
        // through 3 first, and the later equal-cost arrival through 2
        // does not displace it
        let s1 = station(1, "S1");
        let s2 = station(2, "S2");
        let s3 = station(3, "S3");
        let s4 = station(4, "S4");

        let sections = vec![
            section(&s1, &s3, 2),
            section(&s3, &s4, 2),
            section(&s1, &s2, 3),
            section(&s2, &s4, 1),
        ];

        let plan = find_path(&sections, StationId(1), StationId(4)).unwrap();
        assert_eq!(ids(&plan), [1, 3, 4]);
        assert_eq!(plan.total_distance, 4);
    }

    #[test]
    fn conflicting_distances_use_the_smaller() {
        // Two lines cover 1 <-> 2; the cheaper one decides the total
        let s1 = station(1, "S1");
        let s2 = station(2, "S2");

        let sections = vec![section(&s1, &s2, 10), section(&s2, &s1, 3)];

        let plan = find_path(&sections, StationId(1), StationId(2)).unwrap();
        assert_eq!(plan.total_distance, 3);
    }

    #[test]
    fn single_section_route() {
        let a = station(1, "A");
        let b = station(2, "B");

        let plan = find_path(&[section(&a, &b, 7)], StationId(1), StationId(2)).unwrap();

        assert_eq!(ids(&plan), [1, 2]);
        assert_eq!(plan.total_distance, 7);
    }

    #[test]
    fn finder_answers_many_queries_over_one_graph() {
        let a = station(1, "A");
        let b = station(2, "B");
        let c = station(3, "C");

        let finder = PathFinder::new(&[section(&a, &b, 2), section(&b, &c, 3)]);

        assert_eq!(finder.find(StationId(1), StationId(3)).unwrap().total_distance, 5);
        assert_eq!(finder.find(StationId(3), StationId(2)).unwrap().total_distance, 3);
        assert_eq!(finder.graph().station_count(), 3);
    }
}
