//! Dense index over route identities.
//!
//! Assigns each route a contiguous index from 0 so that per-route data can
//! live in arrays instead of hash maps. The index is a bijection over the
//! routes it was built from and never changes afterwards.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::{AgencyId, CompositeRouteId, Route, RouteId, StationId, TransportMode, TransportModes};
use crate::persist::{Cacheable, PersistError};

use super::RouteIndexError;

/// Position of a route in a [`RouteIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteIdx(pub u32);

impl RouteIdx {
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct IndexedRoute {
    id: RouteId,
    mode: TransportMode,
}

/// Bidirectional map between route identities and dense indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteIndex {
    entries: Vec<IndexedRoute>,
    by_id: HashMap<RouteId, RouteIdx>,
}

impl RouteIndex {
    /// Index `routes` in the order given.
    ///
    /// A route id seen more than once keeps its first index.
    pub fn build<'a, I>(routes: I) -> Self
    where
        I: IntoIterator<Item = &'a Route>,
    {
        let mut index = RouteIndex::default();
        let mut duplicates = 0usize;

        for route in routes {
            if index.by_id.contains_key(&route.id) {
                duplicates += 1;
                continue;
            }
            index.push(route.id.clone(), route.mode);
        }

        if duplicates > 0 {
            warn!(duplicates, "Duplicate route ids ignored while building route index");
        }
        info!(routes = index.len(), "Built route index");
        index
    }

    fn push(&mut self, id: RouteId, mode: TransportMode) {
        let idx = RouteIdx(self.entries.len() as u32);
        self.by_id.insert(id.clone(), idx);
        self.entries.push(IndexedRoute { id, mode });
    }

    /// The dense index of a route.
    pub fn index_for(&self, id: &RouteId) -> Result<RouteIdx, RouteIndexError> {
        self.by_id
            .get(id)
            .copied()
            .ok_or_else(|| RouteIndexError::RouteNotFound(id.clone()))
    }

    /// The route at a dense index.
    pub fn route_for(&self, idx: RouteIdx) -> Result<&RouteId, RouteIndexError> {
        self.entry(idx).map(|e| &e.id)
    }

    /// The transport mode of the route at a dense index.
    pub fn mode_of(&self, idx: RouteIdx) -> Result<TransportMode, RouteIndexError> {
        self.entry(idx).map(|e| e.mode)
    }

    fn entry(&self, idx: RouteIdx) -> Result<&IndexedRoute, RouteIndexError> {
        self.entries
            .get(idx.as_usize())
            .ok_or(RouteIndexError::IndexOutOfRange {
                index: idx.0,
                len: self.entries.len(),
            })
    }

    pub fn has_index_for(&self, id: &RouteId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Number of indexed routes whose mode is in `modes`.
    pub fn size_for(&self, modes: TransportModes) -> usize {
        self.entries.iter().filter(|e| modes.contains(e.mode)).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every route in index order.
    pub fn iter(&self) -> impl Iterator<Item = (RouteIdx, &RouteId, TransportMode)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (RouteIdx(i as u32), &e.id, e.mode))
    }

    /// The set of indexed route ids, for freshness checks.
    pub fn route_ids(&self) -> HashSet<RouteId> {
        self.by_id.keys().cloned().collect()
    }
}

/// Which form of [`RouteId`] a record holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteIdKind {
    Flat,
    Composite,
}

/// One persisted `(index, route)` pair.
///
/// Flat ids use `route_id`; composite ids use the four key fields. Unused
/// fields are empty strings and a zero sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteIndexRecord {
    pub index: u32,
    pub mode: TransportMode,
    pub kind: RouteIdKind,
    pub route_id: String,
    pub begin: String,
    pub end: String,
    pub agency: String,
    pub sequence: u32,
}

impl RouteIndexRecord {
    fn new(idx: RouteIdx, id: &RouteId, mode: TransportMode) -> Self {
        let mut record = RouteIndexRecord {
            index: idx.0,
            mode,
            kind: RouteIdKind::Flat,
            route_id: String::new(),
            begin: String::new(),
            end: String::new(),
            agency: String::new(),
            sequence: 0,
        };
        match id {
            RouteId::Flat(flat) => record.route_id = flat.to_string(),
            RouteId::Composite(c) => {
                record.kind = RouteIdKind::Composite;
                record.begin = c.begin().to_string();
                record.end = c.end().to_string();
                record.agency = c.agency().to_string();
                record.sequence = c.sequence();
            }
        }
        record
    }

    fn to_route_id(&self) -> Result<RouteId, PersistError> {
        match self.kind {
            RouteIdKind::Flat
                if self.begin.is_empty()
                    && self.end.is_empty()
                    && self.agency.is_empty()
                    && self.sequence == 0 =>
            {
                Ok(RouteId::flat(&self.route_id))
            }
            RouteIdKind::Composite if self.route_id.is_empty() && self.sequence >= 1 => {
                Ok(RouteId::Composite(CompositeRouteId::new(
                    StationId::new(&self.begin),
                    StationId::new(&self.end),
                    AgencyId::new(&self.agency),
                    self.sequence,
                )))
            }
            kind => Err(PersistError::Invalid(format!(
                "route index record {} has fields inconsistent with a {kind:?} id",
                self.index
            ))),
        }
    }
}

impl Cacheable for RouteIndex {
    type Record = RouteIndexRecord;
    const CACHE_NAME: &'static str = "route_index";

    fn cache_to(&self, sink: &mut Vec<RouteIndexRecord>) {
        sink.extend(
            self.iter()
                .map(|(idx, id, mode)| RouteIndexRecord::new(idx, id, mode)),
        );
    }

    fn load_from(mut records: Vec<RouteIndexRecord>) -> Result<Self, PersistError> {
        records.sort_by_key(|r| r.index);

        let mut index = RouteIndex::default();
        for (expected, record) in records.iter().enumerate() {
            if record.index as usize != expected {
                return Err(PersistError::Invalid(format!(
                    "route index records not contiguous: expected {expected}, found {}",
                    record.index
                )));
            }
            let id = record.to_route_id()?;
            if index.by_id.contains_key(&id) {
                return Err(PersistError::Invalid(format!(
                    "route {id} appears more than once"
                )));
            }
            index.push(id, record.mode);
        }
        Ok(index)
    }
}
