//! Route adjacency graph.
//!
//! One vertex per indexed route; two routes are adjacent when they call at
//! a common station, i.e. a passenger can change between them there.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::domain::{StationId, TransportModes};
use crate::repository::RouteStations;
use crate::routes::{RouteIdx, RouteIndex};

/// Hop count recorded for vertices a BFS never reaches.
pub const UNREACHED: u8 = u8::MAX;

/// Largest finite hop count; longer chains saturate here.
pub const MAX_HOPS: u8 = u8::MAX - 1;

/// Undirected adjacency between routes, keyed by dense route index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAdjacency {
    neighbours: Vec<Vec<u32>>,
}

impl RouteAdjacency {
    /// Build adjacency for every route in `index`.
    ///
    /// With a `filter`, routes whose mode is outside it get no edges, so
    /// changes can only be made between routes of the permitted modes.
    pub fn build<S>(index: &RouteIndex, stations: &S, filter: Option<TransportModes>) -> Self
    where
        S: RouteStations + ?Sized,
    {
        let mut routes_at: HashMap<StationId, Vec<u32>> = HashMap::new();

        for (idx, id, mode) in index.iter() {
            if filter.is_some_and(|f| !f.contains(mode)) {
                continue;
            }
            for station in stations.stations_for(id) {
                routes_at.entry(station).or_default().push(idx.0);
            }
        }

        let mut neighbours: Vec<Vec<u32>> = vec![Vec::new(); index.len()];
        for routes in routes_at.values() {
            for (i, &a) in routes.iter().enumerate() {
                for &b in &routes[i + 1..] {
                    if a != b {
                        neighbours[a as usize].push(b);
                        neighbours[b as usize].push(a);
                    }
                }
            }
        }
        for list in &mut neighbours {
            list.sort_unstable();
            list.dedup();
        }

        let adjacency = Self { neighbours };
        debug!(
            routes = adjacency.len(),
            stations = routes_at.len(),
            edges = adjacency.edge_count(),
            filter = ?filter,
            "Built route adjacency"
        );
        adjacency
    }

    /// Build directly from neighbour lists. Lists are made symmetric.
    pub fn from_edges(size: usize, edges: &[(u32, u32)]) -> Self {
        let mut neighbours: Vec<Vec<u32>> = vec![Vec::new(); size];
        for &(a, b) in edges {
            if a != b && (a as usize) < size && (b as usize) < size {
                neighbours[a as usize].push(b);
                neighbours[b as usize].push(a);
            }
        }
        for list in &mut neighbours {
            list.sort_unstable();
            list.dedup();
        }
        Self { neighbours }
    }

    /// Number of routes (vertices).
    pub fn len(&self) -> usize {
        self.neighbours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbours.is_empty()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.neighbours.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Routes sharing a station with `route`, ascending.
    pub fn neighbours(&self, route: RouteIdx) -> &[u32] {
        self.neighbours
            .get(route.as_usize())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Minimum number of hops from `source` to every route.
    ///
    /// Unreachable routes are [`UNREACHED`]; the source itself is 0.
    pub fn hops_from(&self, source: RouteIdx) -> Vec<u8> {
        let mut hops = vec![UNREACHED; self.len()];
        let Some(start) = hops.get_mut(source.as_usize()) else {
            return hops;
        };
        *start = 0;

        let mut queue = VecDeque::from([source.0]);
        while let Some(current) = queue.pop_front() {
            let next = hops[current as usize].saturating_add(1).min(MAX_HOPS);
            for &neighbour in &self.neighbours[current as usize] {
                if hops[neighbour as usize] == UNREACHED {
                    hops[neighbour as usize] = next;
                    queue.push_back(neighbour);
                }
            }
        }
        hops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AgencyId, Route, RouteId, TransportMode};
    use crate::repository::{InMemoryNetwork, RouteRepository};

    fn route(id: &str, mode: TransportMode) -> Route {
        Route::new(RouteId::flat(id), id, AgencyId::new("A"), mode)
    }

    fn network() -> InMemoryNetwork {
        let mut network = InMemoryNetwork::new();
        network.add_route(route("X", TransportMode::Tram), ["S", "X1"]);
        network.add_route(route("Y", TransportMode::Tram), ["S", "Y1", "T"]);
        network.add_route(route("Z", TransportMode::Bus), ["T", "Z1"]);
        network.add_route(route("W", TransportMode::Bus), ["W1"]);
        network
    }

    fn build(filter: Option<TransportModes>) -> RouteAdjacency {
        let network = network();
        let index = RouteIndex::build(&network.routes());
        RouteAdjacency::build(&index, &network, filter)
    }

    #[test]
    fn shared_station_creates_edge() {
        let adjacency = build(None);
        assert_eq!(adjacency.len(), 4);
        assert_eq!(adjacency.edge_count(), 2);
        assert_eq!(adjacency.neighbours(RouteIdx(0)), &[1]);
        assert_eq!(adjacency.neighbours(RouteIdx(1)), &[0, 2]);
        assert_eq!(adjacency.neighbours(RouteIdx(2)), &[1]);
        assert!(adjacency.neighbours(RouteIdx(3)).is_empty());
    }

    #[test]
    fn filter_removes_edges_of_other_modes() {
        let adjacency = build(Some(TransportMode::Tram.into()));
        assert_eq!(adjacency.len(), 4);
        assert_eq!(adjacency.edge_count(), 1);
        assert_eq!(adjacency.neighbours(RouteIdx(1)), &[0]);
        assert!(adjacency.neighbours(RouteIdx(2)).is_empty());
    }

    #[test]
    fn bfs_hops() {
        let adjacency = build(None);
        assert_eq!(adjacency.hops_from(RouteIdx(0)), vec![0, 1, 2, UNREACHED]);
        assert_eq!(adjacency.hops_from(RouteIdx(3)), vec![UNREACHED, UNREACHED, UNREACHED, 0]);
    }

    #[test]
    fn bfs_from_unknown_source_reaches_nothing() {
        let adjacency = build(None);
        assert!(adjacency.hops_from(RouteIdx(9)).iter().all(|&h| h == UNREACHED));
    }

    #[test]
    fn from_edges_is_symmetric_and_deduplicated() {
        let adjacency = RouteAdjacency::from_edges(3, &[(0, 1), (1, 0), (1, 1), (2, 7)]);
        assert_eq!(adjacency.edge_count(), 1);
        assert_eq!(adjacency.neighbours(RouteIdx(1)), &[0]);
    }

    #[test]
    fn long_chain_hops() {
        let edges: Vec<(u32, u32)> = (0..9).map(|i| (i, i + 1)).collect();
        let adjacency = RouteAdjacency::from_edges(10, &edges);
        let hops = adjacency.hops_from(RouteIdx(0));
        assert_eq!(hops, (0..10).collect::<Vec<u8>>());
    }
}
