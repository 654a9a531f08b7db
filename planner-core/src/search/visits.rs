//! Memoized node-visit outcomes for the live search.
//!
//! Shared by every search task. Writers may race: a cacheable outcome is a
//! function of the static timetable, so whichever value lands is correct.

use moka::sync::Cache;
use tracing::trace;

use crate::config::VisitCacheConfig;
use crate::domain::TimeOfDay;
use crate::graph::NodeId;

use super::{OutcomeCode, VisitScope};

/// Entry counts per key family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisitCounts {
    pub by_node: u64,
    pub by_node_and_time: u64,
}

/// Concurrent cache of cacheable [`OutcomeCode`]s.
///
/// Cloning is cheap and clones share entries.
///
/// # Examples
///
/// ```
/// use planner_core::config::VisitCacheConfig;
/// use planner_core::domain::TimeOfDay;
/// use planner_core::graph::NodeId;
/// use planner_core::search::{OutcomeCode, VisitCache};
///
/// let cache = VisitCache::new(&VisitCacheConfig::default());
/// let eight = TimeOfDay::of(8, 0).unwrap();
/// let nine = TimeOfDay::of(9, 0).unwrap();
///
/// cache.record_visit_if_useful(OutcomeCode::NotOnQueryDate, NodeId(7), eight);
/// assert_eq!(cache.get_previous_result(NodeId(7), nine), Some(OutcomeCode::NotOnQueryDate));
///
/// cache.record_visit_if_useful(OutcomeCode::TooManyChanges, NodeId(8), eight);
/// assert_eq!(cache.get_previous_result(NodeId(8), eight), None);
/// ```
#[derive(Clone)]
pub struct VisitCache {
    by_node: Cache<NodeId, OutcomeCode>,
    by_node_and_time: Cache<(NodeId, TimeOfDay), OutcomeCode>,
}

impl VisitCache {
    pub fn new(config: &VisitCacheConfig) -> Self {
        let mut by_node = Cache::builder().max_capacity(config.max_capacity);
        let mut by_node_and_time = Cache::builder().max_capacity(config.max_capacity);
        if let Some(idle) = config.time_to_idle {
            by_node = by_node.time_to_idle(idle);
            by_node_and_time = by_node_and_time.time_to_idle(idle);
        }

        Self {
            by_node: by_node.build(),
            by_node_and_time: by_node_and_time.build(),
        }
    }

    /// Remember `outcome` for `node` if it is cacheable; otherwise a no-op.
    ///
    /// Replaces any earlier outcome under the same key. Storage is
    /// best-effort: once a family reaches `max_capacity` the cache may evict
    /// an older entry or decline this one, and a later lookup then misses.
    pub fn record_visit_if_useful(&self, outcome: OutcomeCode, node: NodeId, time: TimeOfDay) {
        match outcome.visit_scope() {
            Some(VisitScope::Node) => {
                trace!(%node, %outcome, "Recording visit");
                self.by_node.insert(node, outcome);
            }
            Some(VisitScope::NodeAndTime) => {
                trace!(%node, %time, %outcome, "Recording timed visit");
                self.by_node_and_time.insert((node, time), outcome);
            }
            None => {}
        }
    }

    /// The memoized outcome for `node` at `time`, if any.
    ///
    /// An entry for the exact time wins over one for the node alone.
    pub fn get_previous_result(&self, node: NodeId, time: TimeOfDay) -> Option<OutcomeCode> {
        let found = self
            .by_node_and_time
            .get(&(node, time))
            .or_else(|| self.by_node.get(&node));
        if let Some(outcome) = found {
            trace!(%node, %time, %outcome, "Visit cache hit");
        }
        found
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.by_node.invalidate_all();
        self.by_node_and_time.invalidate_all();
    }

    /// Current entry counts, after pending maintenance has run.
    pub fn entry_counts(&self) -> VisitCounts {
        self.by_node.run_pending_tasks();
        self.by_node_and_time.run_pending_tasks();
        VisitCounts {
            by_node: self.by_node.entry_count(),
            by_node_and_time: self.by_node_and_time.entry_count(),
        }
    }
}

impl Default for VisitCache {
    fn default() -> Self {
        Self::new(&VisitCacheConfig::default())
    }
}
