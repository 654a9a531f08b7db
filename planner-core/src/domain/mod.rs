//! Domain types for the planner core.
//!
//! Identifiers here are opaque: the data sources that produce them are
//! trusted, and nothing downstream inspects their text beyond equality,
//! ordering and hashing.

mod agency;
mod mode;
mod pattern;
mod route;
mod station;
mod time;

pub use agency::AgencyId;
pub use mode::{TransportMode, TransportModes};
pub use pattern::{CallingPointPattern, PatternKey};
pub use route::{CompositeRouteId, Route, RouteId};
pub use station::{Station, StationId};
pub use time::{TimeError, TimeOfDay};
