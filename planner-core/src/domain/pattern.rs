//! Calling-point patterns.

use std::cmp::Ordering;

use super::{AgencyId, StationId};

/// The grouping key of a pattern: first station, last station, agency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternKey {
    pub begin: StationId,
    pub end: StationId,
    pub agency: AgencyId,
}

/// One agency's ordered sequence of calling points for a service variant.
///
/// Patterns order longest first, then by station sequence, so that a
/// maximal pattern is always processed before any of its sub-journeys:
///
/// ```
/// use planner_core::domain::{AgencyId, CallingPointPattern};
///
/// let vt = AgencyId::new("VT");
/// let long = CallingPointPattern::from_ids(vt.clone(), ["PICC", "STKP", "CREW", "EUS"]);
/// let short = CallingPointPattern::from_ids(vt, ["PICC", "STKP", "EUS"]);
///
/// assert!(long < short);
/// assert!(short.is_subsequence_of(&long));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallingPointPattern {
    agency: AgencyId,
    stations: Vec<StationId>,
}

impl CallingPointPattern {
    pub fn new(agency: AgencyId, stations: Vec<StationId>) -> Self {
        Self { agency, stations }
    }

    /// Convenience constructor from raw station id strings.
    pub fn from_ids<I, S>(agency: AgencyId, stations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(agency, stations.into_iter().map(StationId::new).collect())
    }

    pub fn agency(&self) -> &AgencyId {
        &self.agency
    }

    pub fn stations(&self) -> &[StationId] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn begin(&self) -> Option<&StationId> {
        self.stations.first()
    }

    pub fn end(&self) -> Option<&StationId> {
        self.stations.last()
    }

    /// The `(begin, end, agency)` grouping key, or `None` for an empty pattern.
    pub fn key(&self) -> Option<PatternKey> {
        Some(PatternKey {
            begin: self.begin()?.clone(),
            end: self.end()?.clone(),
            agency: self.agency.clone(),
        })
    }

    /// True if every station of `self` appears in `other`, in the same
    /// order (gaps allowed).
    pub fn is_subsequence_of(&self, other: &CallingPointPattern) -> bool {
        let mut remaining = other.stations.iter();
        self.stations
            .iter()
            .all(|station| remaining.any(|candidate| candidate == station))
    }
}

impl Ord for CallingPointPattern {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .stations
            .len()
            .cmp(&self.stations.len())
            .then_with(|| self.stations.cmp(&other.stations))
            .then_with(|| self.agency.cmp(&other.agency))
    }
}

impl PartialOrd for CallingPointPattern {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
