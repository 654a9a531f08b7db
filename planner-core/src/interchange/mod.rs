//! Route-to-route interchange costs.
//!
//! The minimum number of hops between two routes over the route adjacency
//! graph, computed once for every pair. Search uses it as an admissible
//! lower bound on the changes still needed to reach a destination route.

mod adjacency;
mod digest;
mod matrix;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use crate::domain::{RouteId, TransportModes};
use crate::persist::{Cacheable, PersistError};
use crate::repository::RouteStations;
use crate::routes::{RouteIdx, RouteIndex, RouteIndexError};

pub use adjacency::{MAX_HOPS, RouteAdjacency};
pub use digest::{StationFactsDigest, StationFactsRecord};
pub use matrix::CostMatrix;

use adjacency::UNREACHED;

/// Minimum number of route changes between two routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterchangeCost {
    Hops(u8),
    /// No chain of shared stations connects the routes
    Unreachable,
}

impl InterchangeCost {
    fn from_raw(raw: u8) -> Self {
        if raw == UNREACHED {
            InterchangeCost::Unreachable
        } else {
            InterchangeCost::Hops(raw)
        }
    }

    pub fn hops(self) -> Option<u8> {
        match self {
            InterchangeCost::Hops(h) => Some(h),
            InterchangeCost::Unreachable => None,
        }
    }

    pub fn is_reachable(self) -> bool {
        matches!(self, InterchangeCost::Hops(_))
    }
}

impl PartialOrd for InterchangeCost {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Unreachable sorts after every finite cost.
impl Ord for InterchangeCost {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let key = |c: &InterchangeCost| c.hops().map_or(u16::MAX, u16::from);
        key(self).cmp(&key(other))
    }
}

impl fmt::Display for InterchangeCost {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InterchangeCost::Hops(h) => write!(f, "{h}"),
            InterchangeCost::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// Interchange costs over every indexed route, optionally scoped by mode.
///
/// # Examples
///
/// ```
/// use planner_core::domain::{AgencyId, Route, RouteId, TransportMode};
/// use planner_core::interchange::{InterchangeCost, InterchangeCosts};
/// use planner_core::repository::{InMemoryNetwork, RouteRepository};
/// use planner_core::routes::RouteIndex;
///
/// let mut network = InMemoryNetwork::new();
/// for (id, stops) in [("X", ["S", "A"]), ("Y", ["S", "B"]), ("Z", ["C", "D"])] {
///     let route = Route::new(RouteId::flat(id), id, AgencyId::new("A"), TransportMode::Tram);
///     network.add_route(route, stops);
/// }
/// let index = RouteIndex::build(&network.routes());
/// let costs = InterchangeCosts::build(&index, &network, &[]);
///
/// let (x, y, z) = (RouteId::flat("X"), RouteId::flat("Y"), RouteId::flat("Z"));
/// assert_eq!(costs.cost_between(&index, &x, &y, None), Ok(InterchangeCost::Hops(1)));
/// assert_eq!(costs.cost_between(&index, &x, &z, None), Ok(InterchangeCost::Unreachable));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterchangeCosts {
    full: CostMatrix,
    scoped: Vec<(TransportModes, CostMatrix)>,
}

impl InterchangeCosts {
    /// Build the unscoped matrix plus one per distinct, non-empty filter.
    pub fn build<S>(index: &RouteIndex, stations: &S, filters: &[TransportModes]) -> Self
    where
        S: RouteStations + ?Sized,
    {
        let adjacency = RouteAdjacency::build(index, stations, None);
        let full = CostMatrix::build(&adjacency);
        info!(
            routes = index.len(),
            edges = adjacency.edge_count(),
            "Built interchange costs"
        );

        let mut scoped: Vec<(TransportModes, CostMatrix)> = Vec::new();
        for &filter in filters {
            if filter.is_empty() || scoped.iter().any(|(f, _)| *f == filter) {
                continue;
            }
            let adjacency = RouteAdjacency::build(index, stations, Some(filter));
            info!(
                %filter,
                edges = adjacency.edge_count(),
                "Built mode-scoped interchange costs"
            );
            scoped.push((filter, CostMatrix::build(&adjacency)));
        }

        Self { full, scoped }
    }

    /// Number of routes covered.
    pub fn route_count(&self) -> usize {
        self.full.size()
    }

    /// Mode filters with a precomputed matrix, in build order.
    pub fn filters(&self) -> Vec<TransportModes> {
        self.scoped.iter().map(|(f, _)| *f).collect()
    }

    /// True if exactly `filters` (ignoring order, duplicates and empty sets)
    /// have precomputed matrices.
    pub fn has_filters(&self, filters: &[TransportModes]) -> bool {
        let mut wanted: Vec<TransportModes> = Vec::new();
        for &f in filters {
            if !f.is_empty() && !wanted.contains(&f) {
                wanted.push(f);
            }
        }
        wanted.len() == self.scoped.len() && wanted.iter().all(|f| self.matrix_for(*f).is_some())
    }

    fn matrix_for(&self, filter: TransportModes) -> Option<&CostMatrix> {
        self.scoped
            .iter()
            .find(|(f, _)| *f == filter)
            .map(|(_, m)| m)
    }

    fn matrix(&self, filter: Option<TransportModes>) -> &CostMatrix {
        let Some(filter) = filter else {
            return &self.full;
        };
        match self.matrix_for(filter) {
            Some(matrix) => matrix,
            None => {
                trace!(%filter, "No scoped interchange costs, using unscoped");
                &self.full
            }
        }
    }

    /// Minimum changes between two indexed routes.
    pub fn cost(&self, a: RouteIdx, b: RouteIdx, filter: Option<TransportModes>) -> InterchangeCost {
        self.matrix(filter).get(a, b)
    }

    /// [`InterchangeCosts::cost`] addressed by route id.
    pub fn cost_between(
        &self,
        index: &RouteIndex,
        a: &RouteId,
        b: &RouteId,
        filter: Option<TransportModes>,
    ) -> Result<InterchangeCost, RouteIndexError> {
        Ok(self.cost(index.index_for(a)?, index.index_for(b)?, filter))
    }

    /// The cheapest pair between two route sets, e.g. the routes calling at
    /// two stations. Either set being empty is unreachable.
    pub fn min_cost_between(
        &self,
        from: &[RouteIdx],
        to: &[RouteIdx],
        filter: Option<TransportModes>,
    ) -> InterchangeCost {
        let matrix = self.matrix(filter);
        let mut best = InterchangeCost::Unreachable;
        for &a in from {
            for &b in to {
                let cost = matrix.get(a, b);
                if cost < best {
                    best = cost;
                    if best == InterchangeCost::Hops(0) {
                        return best;
                    }
                }
            }
        }
        best
    }
}

/// One persisted matrix cell. `scope` is `None` for the unscoped matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterchangeCostRecord {
    pub scope: Option<TransportModes>,
    pub route_a: u32,
    pub route_b: u32,
    pub hops: u8,
}

fn matrix_records(scope: Option<TransportModes>, matrix: &CostMatrix, sink: &mut Vec<InterchangeCostRecord>) {
    sink.extend((0..matrix.size() as u32).map(|r| InterchangeCostRecord {
        scope,
        route_a: r,
        route_b: r,
        hops: 0,
    }));
    sink.extend(matrix.finite_cells().map(|(a, b, hops)| InterchangeCostRecord {
        scope,
        route_a: a,
        route_b: b,
        hops,
    }));
}

fn matrix_from_records(
    scope: Option<TransportModes>,
    records: &[InterchangeCostRecord],
) -> Result<CostMatrix, PersistError> {
    let describe = || scope.map_or_else(|| "unscoped".to_string(), |s| s.to_string());

    let size = records.iter().filter(|r| r.route_a == r.route_b).count();
    let mut matrix = CostMatrix::unreachable(size);
    let mut diagonal = vec![false; size];

    for record in records {
        let (a, b) = (record.route_a as usize, record.route_b as usize);
        if a >= size || b >= size {
            return Err(PersistError::Invalid(format!(
                "{} interchange cell ({a}, {b}) outside {size} routes",
                describe()
            )));
        }
        if a == b {
            if record.hops != 0 || diagonal[a] {
                return Err(PersistError::Invalid(format!(
                    "{} interchange diagonal for route {a} is malformed",
                    describe()
                )));
            }
            diagonal[a] = true;
        } else {
            if record.hops == UNREACHED || record.hops == 0 {
                return Err(PersistError::Invalid(format!(
                    "{} interchange cell ({a}, {b}) has invalid hops {}",
                    describe(),
                    record.hops
                )));
            }
            matrix.set(RouteIdx(record.route_a), RouteIdx(record.route_b), record.hops);
        }
    }
    Ok(matrix)
}

impl Cacheable for InterchangeCosts {
    type Record = InterchangeCostRecord;
    const CACHE_NAME: &'static str = "route_interchange_costs";

    fn cache_to(&self, sink: &mut Vec<InterchangeCostRecord>) {
        matrix_records(None, &self.full, sink);
        for (filter, matrix) in &self.scoped {
            matrix_records(Some(*filter), matrix, sink);
        }
    }

    fn load_from(records: Vec<InterchangeCostRecord>) -> Result<Self, PersistError> {
        let mut full_records = Vec::new();
        let mut order: Vec<TransportModes> = Vec::new();
        let mut by_scope: BTreeMap<usize, Vec<InterchangeCostRecord>> = BTreeMap::new();

        for record in records {
            match record.scope {
                None => full_records.push(record),
                Some(filter) => {
                    let slot = match order.iter().position(|f| *f == filter) {
                        Some(slot) => slot,
                        None => {
                            order.push(filter);
                            order.len() - 1
                        }
                    };
                    by_scope.entry(slot).or_default().push(record);
                }
            }
        }

        let full = matrix_from_records(None, &full_records)?;
        let mut scoped = Vec::with_capacity(order.len());
        for (slot, filter) in order.into_iter().enumerate() {
            let records = by_scope.remove(&slot).unwrap_or_default();
            let matrix = matrix_from_records(Some(filter), &records)?;
            if matrix.size() != full.size() {
                return Err(PersistError::Invalid(format!(
                    "{filter} interchange costs cover {} routes, unscoped cover {}",
                    matrix.size(),
                    full.size()
                )));
            }
            scoped.push((filter, matrix));
        }

        Ok(Self { full, scoped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AgencyId, Route, TransportMode};
    use crate::persist::{DataCache, RecordCodec};
    use crate::repository::{InMemoryNetwork, RouteRepository};
    use tempfile::tempdir;

    fn add(network: &mut InMemoryNetwork, id: &str, mode: TransportMode, stops: &[&str]) {
        let route = Route::new(RouteId::flat(id), id, AgencyId::new("A"), mode);
        network.add_route(route, stops.iter().copied());
    }

    /// X and Y share S; Z shares nothing with either.
    fn xyz() -> (InMemoryNetwork, RouteIndex) {
        let mut network = InMemoryNetwork::new();
        add(&mut network, "X", TransportMode::Tram, &["S", "X1"]);
        add(&mut network, "Y", TransportMode::Tram, &["S", "Y1"]);
        add(&mut network, "Z", TransportMode::Tram, &["Z1", "Z2"]);
        let index = RouteIndex::build(&network.routes());
        (network, index)
    }

    /// Tram T1 and T2 meet only via bus B at Interchange stops.
    fn mixed() -> (InMemoryNetwork, RouteIndex) {
        let mut network = InMemoryNetwork::new();
        add(&mut network, "T1", TransportMode::Tram, &["A", "I1"]);
        add(&mut network, "B", TransportMode::Bus, &["I1", "I2"]);
        add(&mut network, "T2", TransportMode::Tram, &["I2", "C"]);
        add(&mut network, "T3", TransportMode::Tram, &["C", "D"]);
        let index = RouteIndex::build(&network.routes());
        (network, index)
    }

    fn id(s: &str) -> RouteId {
        RouteId::flat(s)
    }

    #[test]
    fn shared_station_scenario() {
        let (network, index) = xyz();
        let costs = InterchangeCosts::build(&index, &network, &[]);

        let cost = |a: &str, b: &str| costs.cost_between(&index, &id(a), &id(b), None).unwrap();
        assert_eq!(cost("X", "Y"), InterchangeCost::Hops(1));
        assert_eq!(cost("X", "Z"), InterchangeCost::Unreachable);
        assert_eq!(cost("Y", "Z"), InterchangeCost::Unreachable);
        assert_eq!(cost("Y", "X"), InterchangeCost::Hops(1));
        assert_eq!(cost("Z", "Z"), InterchangeCost::Hops(0));
    }

    #[test]
    fn unknown_route_is_an_error() {
        let (network, index) = xyz();
        let costs = InterchangeCosts::build(&index, &network, &[]);
        assert_eq!(
            costs.cost_between(&index, &id("X"), &id("Q"), None),
            Err(RouteIndexError::RouteNotFound(id("Q")))
        );
    }

    #[test]
    fn mode_scope_restricts_changes() {
        let (network, index) = mixed();
        let tram = TransportModes::only(TransportMode::Tram);
        let costs = InterchangeCosts::build(&index, &network, &[tram]);

        let t1 = index.index_for(&id("T1")).unwrap();
        let t2 = index.index_for(&id("T2")).unwrap();
        let t3 = index.index_for(&id("T3")).unwrap();

        assert_eq!(costs.cost(t1, t2, None), InterchangeCost::Hops(2));
        assert_eq!(costs.cost(t1, t3, None), InterchangeCost::Hops(3));
        assert_eq!(costs.cost(t1, t2, Some(tram)), InterchangeCost::Unreachable);
        assert_eq!(costs.cost(t2, t3, Some(tram)), InterchangeCost::Hops(1));
    }

    #[test]
    fn unknown_filter_uses_unscoped_costs() {
        let (network, index) = mixed();
        let costs = InterchangeCosts::build(&index, &network, &[]);
        let bus = TransportModes::only(TransportMode::Bus);
        let t1 = RouteIdx(0);
        let t2 = RouteIdx(2);
        assert_eq!(costs.cost(t1, t2, Some(bus)), costs.cost(t1, t2, None));
    }

    #[test]
    fn duplicate_and_empty_filters_are_dropped() {
        let (network, index) = mixed();
        let tram = TransportModes::only(TransportMode::Tram);
        let costs = InterchangeCosts::build(&index, &network, &[tram, TransportModes::none(), tram]);
        assert_eq!(costs.filters(), vec![tram]);
        assert!(costs.has_filters(&[tram]));
        assert!(costs.has_filters(&[tram, tram]));
        assert!(!costs.has_filters(&[]));
        assert!(!costs.has_filters(&[TransportModes::all()]));
    }

    #[test]
    fn min_cost_between_sets() {
        let (network, index) = mixed();
        let costs = InterchangeCosts::build(&index, &network, &[]);
        let from = [RouteIdx(0)];
        assert_eq!(
            costs.min_cost_between(&from, &[RouteIdx(2), RouteIdx(3)], None),
            InterchangeCost::Hops(2)
        );
        assert_eq!(
            costs.min_cost_between(&from, &[RouteIdx(3), RouteIdx(0)], None),
            InterchangeCost::Hops(0)
        );
        assert_eq!(costs.min_cost_between(&from, &[], None), InterchangeCost::Unreachable);
    }

    #[test]
    fn cost_ordering() {
        assert!(InterchangeCost::Hops(0) < InterchangeCost::Hops(1));
        assert!(InterchangeCost::Hops(MAX_HOPS) < InterchangeCost::Unreachable);
        assert_eq!(InterchangeCost::Unreachable.hops(), None);
        assert_eq!(InterchangeCost::Hops(2).to_string(), "2");
        assert_eq!(InterchangeCost::Unreachable.to_string(), "unreachable");
    }

    #[test]
    fn records_are_sparse_with_diagonal() {
        let (network, index) = xyz();
        let costs = InterchangeCosts::build(&index, &network, &[]);
        let mut records = Vec::new();
        costs.cache_to(&mut records);
        // three diagonal cells plus X-Y
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.scope.is_none()));
    }

    #[test]
    fn cache_roundtrip() {
        let (network, index) = mixed();
        let tram = TransportModes::only(TransportMode::Tram);
        let both = tram.with(TransportMode::Bus);
        let costs = InterchangeCosts::build(&index, &network, &[tram, both]);

        for codec in [RecordCodec::Json, RecordCodec::Csv] {
            let dir = tempdir().unwrap();
            let cache = DataCache::new(dir.path(), codec);
            cache.save(&costs).unwrap();
            let loaded: InterchangeCosts = cache.load().unwrap().unwrap();
            assert_eq!(loaded, costs);
            assert_eq!(loaded.filters(), vec![tram, both]);
        }
    }

    #[test]
    fn empty_network_roundtrip() {
        let index = RouteIndex::build(&[]);
        let costs = InterchangeCosts::build(&index, &InMemoryNetwork::new(), &[]);
        assert_eq!(costs.route_count(), 0);
        let mut records = Vec::new();
        costs.cache_to(&mut records);
        assert_eq!(InterchangeCosts::load_from(records).unwrap(), costs);
    }

    #[test]
    fn cell_outside_dimension_rejected() {
        let (network, index) = xyz();
        let costs = InterchangeCosts::build(&index, &network, &[]);
        let mut records = Vec::new();
        costs.cache_to(&mut records);
        records.retain(|r| !(r.route_a == 2 && r.route_b == 2));
        records.push(InterchangeCostRecord {
            scope: None,
            route_a: 0,
            route_b: 2,
            hops: 1,
        });
        assert!(matches!(
            InterchangeCosts::load_from(records),
            Err(PersistError::Invalid(_))
        ));
    }

    #[test]
    fn scoped_dimension_mismatch_rejected() {
        let (network, index) = mixed();
        let tram = TransportModes::only(TransportMode::Tram);
        let costs = InterchangeCosts::build(&index, &network, &[tram]);
        let mut records = Vec::new();
        costs.cache_to(&mut records);
        records.retain(|r| !(r.scope.is_some() && r.route_a == 3 && r.route_b == 3));
        assert!(InterchangeCosts::load_from(records).is_err());
    }

    #[test]
    fn zero_hop_off_diagonal_rejected() {
        let records = vec![
            InterchangeCostRecord { scope: None, route_a: 0, route_b: 0, hops: 0 },
            InterchangeCostRecord { scope: None, route_a: 1, route_b: 1, hops: 0 },
            InterchangeCostRecord { scope: None, route_a: 0, route_b: 1, hops: 0 },
        ];
        assert!(InterchangeCosts::load_from(records).is_err());
    }
}
