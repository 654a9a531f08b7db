//! Station identifier and station record.

use std::fmt;
use std::sync::Arc;

/// An opaque, interned station identifier.
///
/// Station ids come from several sources (NaPTAN codes, TIPLOCs, GTFS stop
/// ids) and are never validated: whatever the source supplies is kept as-is.
/// Cloning is cheap, since the text is shared.
///
/// # Examples
///
/// ```
/// use planner_core::domain::StationId;
///
/// let picc = StationId::new("MNCRPIC");
/// assert_eq!(picc.as_str(), "MNCRPIC");
/// assert_eq!(picc, StationId::new("MNCRPIC"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(Arc<str>);

impl StationId {
    /// Create a station id from any string-like value.
    pub fn new(id: impl AsRef<str>) -> Self {
        StationId(Arc::from(id.as_ref()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.as_str())
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for StationId {
    fn from(s: &str) -> Self {
        StationId::new(s)
    }
}

/// A station as produced by a data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub id: StationId,
    pub name: String,
}

impl Station {
    pub fn new(id: StationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
