//! Operating agency identifier.

use std::fmt;
use std::sync::Arc;

/// An opaque, interned identifier for an operating agency.
///
/// For rail data this is normally the two-letter ATOC code (e.g. "VT" for
/// Avanti West Coast), for GTFS feeds the feed's `agency_id`. No format is
/// enforced.
///
/// # Examples
///
/// ```
/// use planner_core::domain::AgencyId;
///
/// let vt = AgencyId::new("VT");
/// assert_eq!(vt.as_str(), "VT");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgencyId(Arc<str>);

impl AgencyId {
    /// Create an agency id from any string-like value.
    pub fn new(id: impl AsRef<str>) -> Self {
        AgencyId(Arc::from(id.as_ref()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AgencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgencyId({})", self.as_str())
    }
}

impl fmt::Display for AgencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for AgencyId {
    fn from(s: &str) -> Self {
        AgencyId::new(s)
    }
}
