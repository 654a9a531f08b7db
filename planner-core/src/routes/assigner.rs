//! Canonical route identities from calling-point patterns.
//!
//! Rail timetables describe individual services, not routes. We group the
//! distinct calling-point patterns by `(begin, end, agency)` and walk each
//! group longest-first: a pattern that is an ordered subsequence of one
//! already claimed (a train starting partway along a longer service, or
//! skipping stops) shares that pattern's identity, anything else claims the
//! next sequence number in the group.
//!
//! The walk is deterministic for a given set of patterns, regardless of the
//! order they were supplied in, so identities are stable across rebuilds.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, info, trace};

use crate::domain::{CallingPointPattern, CompositeRouteId, PatternKey, RouteId};

/// Result of assigning identities to a set of patterns.
#[derive(Debug, Clone, Default)]
pub struct RouteAssignments {
    by_pattern: HashMap<CallingPointPattern, CompositeRouteId>,
}

impl RouteAssignments {
    /// The identity assigned to a pattern, if it was part of the input.
    pub fn route_for(&self, pattern: &CallingPointPattern) -> Option<RouteId> {
        self.by_pattern.get(pattern).cloned().map(RouteId::Composite)
    }

    /// The composite identity assigned to a pattern.
    pub fn composite_for(&self, pattern: &CallingPointPattern) -> Option<&CompositeRouteId> {
        self.by_pattern.get(pattern)
    }

    /// Every distinct identity, sorted.
    pub fn distinct_routes(&self) -> Vec<CompositeRouteId> {
        let unique: BTreeSet<&CompositeRouteId> = self.by_pattern.values().collect();
        unique.into_iter().cloned().collect()
    }

    /// All patterns bound to the given identity, in canonical order.
    pub fn patterns_for(&self, route: &CompositeRouteId) -> Vec<&CallingPointPattern> {
        let mut patterns: Vec<_> = self
            .by_pattern
            .iter()
            .filter(|(_, id)| *id == route)
            .map(|(pattern, _)| pattern)
            .collect();
        patterns.sort();
        patterns
    }

    /// Number of patterns with an identity.
    pub fn len(&self) -> usize {
        self.by_pattern.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pattern.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CallingPointPattern, &CompositeRouteId)> {
        self.by_pattern.iter()
    }
}

/// Assigns composite route identities to calling-point patterns.
///
/// # Examples
///
/// ```
/// use planner_core::domain::{AgencyId, CallingPointPattern};
/// use planner_core::routes::RouteIdAssigner;
///
/// let vt = AgencyId::new("VT");
/// let full = CallingPointPattern::from_ids(vt.clone(), ["PICC", "STKP", "CREW", "EUS"]);
/// let part = CallingPointPattern::from_ids(vt, ["PICC", "CREW", "EUS"]);
///
/// let assignments = RouteIdAssigner::new().assign([full.clone(), part.clone()]);
/// assert_eq!(assignments.route_for(&full), assignments.route_for(&part));
/// assert_eq!(assignments.distinct_routes().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RouteIdAssigner {
    groups: BTreeMap<PatternKey, BTreeSet<CallingPointPattern>>,
    skipped_empty: usize,
}

impl RouteIdAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observed pattern. Duplicates are ignored.
    pub fn add(&mut self, pattern: CallingPointPattern) {
        match pattern.key() {
            Some(key) => {
                self.groups.entry(key).or_default().insert(pattern);
            }
            None => {
                debug!(agency = %pattern.agency(), "Skipping empty calling-point pattern");
                self.skipped_empty += 1;
            }
        }
    }

    /// Record every pattern from `patterns`, then assign.
    pub fn assign<I>(mut self, patterns: I) -> RouteAssignments
    where
        I: IntoIterator<Item = CallingPointPattern>,
    {
        for pattern in patterns {
            self.add(pattern);
        }
        self.finish()
    }

    /// Assign identities to every pattern recorded so far.
    pub fn finish(self) -> RouteAssignments {
        let mut by_pattern = HashMap::new();
        let mut identities = 0usize;

        for (key, patterns) in self.groups {
            // BTreeSet iteration follows the canonical pattern ordering
            let mut claimed: Vec<(CallingPointPattern, CompositeRouteId)> = Vec::new();

            for pattern in patterns {
                let existing = claimed
                    .iter()
                    .find(|(owner, _)| pattern.is_subsequence_of(owner))
                    .map(|(_, id)| id.clone());

                let id = match existing {
                    Some(id) => {
                        trace!(route = %id, stations = pattern.len(), "Pattern merged into existing route");
                        id
                    }
                    None => {
                        let sequence = claimed.len() as u32 + 1;
                        let id = CompositeRouteId::new(
                            key.begin.clone(),
                            key.end.clone(),
                            key.agency.clone(),
                            sequence,
                        );
                        trace!(route = %id, stations = pattern.len(), "New route identity");
                        claimed.push((pattern.clone(), id.clone()));
                        identities += 1;
                        id
                    }
                };

                by_pattern.insert(pattern, id);
            }
        }

        info!(
            patterns = by_pattern.len(),
            identities,
            skipped_empty = self.skipped_empty,
            "Assigned route identities"
        );

        RouteAssignments { by_pattern }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::AgencyId;
    use proptest::prelude::*;

    /// Patterns between fixed ends with a random middle.
    fn pattern() -> impl Strategy<Value = CallingPointPattern> {
        proptest::collection::vec("[A-F]", 0..5).prop_map(|middle| {
            let mut stations = vec!["START".to_string()];
            stations.extend(middle);
            stations.push("END".to_string());
            CallingPointPattern::from_ids(AgencyId::new("VT"), stations)
        })
    }

    proptest! {
        /// The same set of patterns in any order yields the same identities
        #[test]
        fn order_independent(patterns in proptest::collection::vec(pattern(), 1..12)) {
            let forward = RouteIdAssigner::new().assign(patterns.iter().cloned());
            let backward = RouteIdAssigner::new().assign(patterns.iter().rev().cloned());
            for p in &patterns {
                prop_assert_eq!(forward.route_for(p), backward.route_for(p));
            }
        }

        /// Sequence numbers in a group are contiguous from 1
        #[test]
        fn sequences_contiguous(patterns in proptest::collection::vec(pattern(), 1..12)) {
            let assignments = RouteIdAssigner::new().assign(patterns);
            let sequences: Vec<u32> = assignments
                .distinct_routes()
                .iter()
                .map(|id| id.sequence())
                .collect();
            let expected: Vec<u32> = (1..=sequences.len() as u32).collect();
            prop_assert_eq!(sequences, expected);
        }

        /// Every pattern is a subsequence of its identity's owning pattern
        #[test]
        fn merged_patterns_are_subsequences(patterns in proptest::collection::vec(pattern(), 1..12)) {
            let assignments = RouteIdAssigner::new().assign(patterns);
            for route in assignments.distinct_routes() {
                let members = assignments.patterns_for(&route);
                let owner = members[0];
                for member in &members {
                    prop_assert!(member.is_subsequence_of(owner));
                }
            }
        }
    }
}
