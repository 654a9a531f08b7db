//! Outcomes of evaluating a node during traversal.

use std::fmt;

/// What the traversal concluded on reaching a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeCode {
    /// Keep expanding from here
    Continue,
    Arrived,
    ReturnedToStart,
    AlreadyDeparted,
    /// The service does not run on the query date
    NotOnQueryDate,
    /// No departure in this hour slot
    NotAtHour,
    NotAtQueryTime,
    /// The service runs on the date but not at this time of day
    DoesNotOperateOnTime,
    TooManyChanges,
    TooManyWalkingConnections,
    LongerPath,
    ExceedsMaxJourneyDuration,
    StationClosed,
    TransportModeWrong,
}

/// The key an outcome is memoized under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitScope {
    /// Holds for the node at every query time.
    Node,
    /// Holds only for the exact `(node, time)` pair.
    NodeAndTime,
}

impl OutcomeCode {
    /// How this outcome may be memoized. `None` means never.
    ///
    /// Only outcomes that follow from the timetable alone qualify; the rest
    /// depend on the journey so far.
    pub fn visit_scope(self) -> Option<VisitScope> {
        match self {
            OutcomeCode::NotOnQueryDate | OutcomeCode::DoesNotOperateOnTime => {
                Some(VisitScope::Node)
            }
            OutcomeCode::NotAtHour => Some(VisitScope::NodeAndTime),
            _ => None,
        }
    }

    pub fn is_cacheable(self) -> bool {
        self.visit_scope().is_some()
    }
}

impl fmt::Display for OutcomeCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
