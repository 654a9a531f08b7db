//! Route identities.
//!
//! GTFS-style sources supply their own route ids, which we keep verbatim.
//! Rail timetables have no stable route id at all, so rail routes are given
//! a composite identity synthesised from their calling-point patterns (see
//! [`crate::routes::RouteIdAssigner`]).

use std::fmt;
use std::sync::Arc;

use super::{AgencyId, StationId, TransportMode};

/// A composite route identity: begin and end station, agency, and a
/// 1-based sequence number distinguishing variants between the same ends.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeRouteId {
    begin: StationId,
    end: StationId,
    agency: AgencyId,
    sequence: u32,
}

impl CompositeRouteId {
    pub fn new(begin: StationId, end: StationId, agency: AgencyId, sequence: u32) -> Self {
        Self {
            begin,
            end,
            agency,
            sequence,
        }
    }

    pub fn begin(&self) -> &StationId {
        &self.begin
    }

    pub fn end(&self) -> &StationId {
        &self.end
    }

    pub fn agency(&self) -> &AgencyId {
        &self.agency
    }

    /// Sequence number within the `(begin, end, agency)` group, starting at 1.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }
}

impl fmt::Debug for CompositeRouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompositeRouteId({})", self)
    }
}

impl fmt::Display for CompositeRouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.begin, self.end, self.agency, self.sequence
        )
    }
}

/// The permanent identity of a route.
///
/// # Examples
///
/// ```
/// use planner_core::domain::{AgencyId, CompositeRouteId, RouteId, StationId};
///
/// let flat = RouteId::flat("METLBLUE:I:");
/// assert_eq!(flat.to_string(), "METLBLUE:I:");
///
/// let rail = RouteId::Composite(CompositeRouteId::new(
///     StationId::new("MNCRPIC"),
///     StationId::new("EUSTON"),
///     AgencyId::new("VT"),
///     1,
/// ));
/// assert_eq!(rail.to_string(), "MNCRPIC:EUSTON:VT:1");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteId {
    /// An id supplied by the data source.
    Flat(Arc<str>),
    /// An id synthesised from calling-point patterns.
    Composite(CompositeRouteId),
}

impl RouteId {
    pub fn flat(id: impl AsRef<str>) -> Self {
        RouteId::Flat(Arc::from(id.as_ref()))
    }

    pub fn as_composite(&self) -> Option<&CompositeRouteId> {
        match self {
            RouteId::Composite(c) => Some(c),
            RouteId::Flat(_) => None,
        }
    }
}

impl From<CompositeRouteId> for RouteId {
    fn from(id: CompositeRouteId) -> Self {
        RouteId::Composite(id)
    }
}

impl fmt::Debug for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteId({})", self)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteId::Flat(id) => f.write_str(id),
            RouteId::Composite(id) => fmt::Display::fmt(id, f),
        }
    }
}

/// A route as known to the live route repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub id: RouteId,
    pub name: String,
    pub agency: AgencyId,
    pub mode: TransportMode,
}

impl Route {
    pub fn new(id: RouteId, name: impl Into<String>, agency: AgencyId, mode: TransportMode) -> Self {
        Self {
            id,
            name: name.into(),
            agency,
            mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composite(seq: u32) -> CompositeRouteId {
        CompositeRouteId::new(
            StationId::new("MNCRPIC"),
            StationId::new("EUSTON"),
            AgencyId::new("VT"),
            seq,
        )
    }

    #[test]
    fn composite_accessors() {
        let id = composite(2);
        assert_eq!(id.begin().as_str(), "MNCRPIC");
        assert_eq!(id.end().as_str(), "EUSTON");
        assert_eq!(id.agency().as_str(), "VT");
        assert_eq!(id.sequence(), 2);
    }

    #[test]
    fn display() {
        assert_eq!(RouteId::from(composite(3)).to_string(), "MNCRPIC:EUSTON:VT:3");
        assert_eq!(RouteId::flat("R1").to_string(), "R1");
        assert_eq!(format!("{:?}", RouteId::flat("R1")), "RouteId(R1)");
    }

    #[test]
    fn flat_and_composite_never_equal() {
        let flat = RouteId::flat("MNCRPIC:EUSTON:VT:1");
        let rail = RouteId::from(composite(1));
        assert_eq!(flat.to_string(), rail.to_string());
        assert_ne!(flat, rail);
    }

    #[test]
    fn as_composite() {
        assert!(RouteId::flat("R1").as_composite().is_none());
        assert_eq!(RouteId::from(composite(1)).as_composite(), Some(&composite(1)));
    }
}
