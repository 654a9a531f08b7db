//! Structures consulted by the live time-dependent search.

mod outcome;
mod visits;

pub use outcome::{OutcomeCode, VisitScope};
pub use visits::{VisitCache, VisitCounts};
