//! Interfaces to the live timetable data.
//!
//! The caches in this crate are built from, and validated against, data
//! owned by the import pipeline. These traits are the only view they need.

use std::collections::{BTreeSet, HashMap};

use crate::domain::{Route, RouteId, StationId};

/// The live set of routes.
pub trait RouteRepository {
    /// Every route currently known, in a stable order.
    fn routes(&self) -> Vec<Route>;
}

/// Which stations each route calls at.
pub trait RouteStations {
    /// Calling stations of a route. Unknown routes have none.
    fn stations_for(&self, route: &RouteId) -> Vec<StationId>;
}

/// Routes and their calling stations held in memory.
///
/// Routes keep insertion order, which becomes index order when a
/// [`crate::routes::RouteIndex`] is built from this repository.
///
/// # Examples
///
/// ```
/// use planner_core::domain::{AgencyId, Route, RouteId, TransportMode};
/// use planner_core::repository::{InMemoryNetwork, RouteRepository, RouteStations};
///
/// let mut network = InMemoryNetwork::new();
/// let blue = Route::new(RouteId::flat("BLUE"), "Blue", AgencyId::new("METL"), TransportMode::Tram);
/// network.add_route(blue.clone(), ["Bury", "Victoria", "Piccadilly"]);
///
/// assert_eq!(network.routes(), vec![blue.clone()]);
/// assert_eq!(network.stations_for(&blue.id).len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryNetwork {
    routes: Vec<Route>,
    stations: HashMap<RouteId, BTreeSet<StationId>>,
}

impl InMemoryNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route and the stations it calls at.
    ///
    /// Adding a route id again merges in the new stations and keeps the
    /// original route record.
    pub fn add_route<I, S>(&mut self, route: Route, stations: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<StationId>,
    {
        let calling = self.stations.entry(route.id.clone()).or_default();
        calling.extend(stations.into_iter().map(Into::into));
        if !self.routes.iter().any(|r| r.id == route.id) {
            self.routes.push(route);
        }
    }

    /// Remove a route entirely.
    pub fn remove_route(&mut self, id: &RouteId) {
        self.routes.retain(|r| &r.id != id);
        self.stations.remove(id);
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl RouteRepository for InMemoryNetwork {
    fn routes(&self) -> Vec<Route> {
        self.routes.clone()
    }
}

impl RouteStations for InMemoryNetwork {
    fn stations_for(&self, route: &RouteId) -> Vec<StationId> {
        self.stations
            .get(route)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default()
    }
}
