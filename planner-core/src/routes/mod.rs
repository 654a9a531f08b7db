//! Route identities and the dense route index.
//!
//! Identities are assigned once per import, either taken verbatim from the
//! source (GTFS) or synthesised from calling-point patterns (rail), and the
//! resulting route set is indexed densely for array-based lookups during
//! search.

mod assigner;
mod error;
mod index;
mod source;

pub use assigner::{RouteAssignments, RouteIdAssigner};
pub use error::RouteIndexError;
pub use index::{RouteIdKind, RouteIdx, RouteIndex, RouteIndexRecord};
pub use source::{GtfsRouteFactory, GtfsRouteRecord, RailRouteFactory, RouteFactory};
