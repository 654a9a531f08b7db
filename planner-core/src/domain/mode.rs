//! Transport modes and mode filters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of vehicle a route is operated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransportMode {
    Tram,
    Bus,
    Train,
    Subway,
    Ferry,
    Walk,
}

impl TransportMode {
    /// All modes, in bit order.
    pub const ALL: [TransportMode; 6] = [
        TransportMode::Tram,
        TransportMode::Bus,
        TransportMode::Train,
        TransportMode::Subway,
        TransportMode::Ferry,
        TransportMode::Walk,
    ];

    /// Look up a mode from its single-character code.
    ///
    /// Codes are case-insensitive: `t` tram, `b` bus, `r` rail,
    /// `u` underground/subway, `f` ferry, `w` walk.
    ///
    /// ```
    /// use planner_core::domain::TransportMode;
    ///
    /// assert_eq!(TransportMode::from_code('t'), Some(TransportMode::Tram));
    /// assert_eq!(TransportMode::from_code('R'), Some(TransportMode::Train));
    /// assert_eq!(TransportMode::from_code('x'), None);
    /// ```
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_lowercase() {
            't' => Some(TransportMode::Tram),
            'b' => Some(TransportMode::Bus),
            'r' => Some(TransportMode::Train),
            'u' => Some(TransportMode::Subway),
            'f' => Some(TransportMode::Ferry),
            'w' => Some(TransportMode::Walk),
            _ => None,
        }
    }

    /// The single-character code for this mode (lower case).
    pub fn code(self) -> char {
        match self {
            TransportMode::Tram => 't',
            TransportMode::Bus => 'b',
            TransportMode::Train => 'r',
            TransportMode::Subway => 'u',
            TransportMode::Ferry => 'f',
            TransportMode::Walk => 'w',
        }
    }

    /// Map a GTFS `route_type` to a mode.
    ///
    /// Covers the basic GTFS types and the extended (hierarchical) ranges
    /// for rail, bus, tram and water transport.
    pub fn from_gtfs_route_type(route_type: u16) -> Option<Self> {
        match route_type {
            0 | 900..=999 => Some(TransportMode::Tram),
            1 | 400..=499 => Some(TransportMode::Subway),
            2 | 100..=199 => Some(TransportMode::Train),
            3 | 11 | 200..=299 | 700..=799 => Some(TransportMode::Bus),
            4 | 1000..=1099 | 1200..=1299 => Some(TransportMode::Ferry),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A set of transport modes, used to filter routes.
///
/// ```
/// use planner_core::domain::{TransportMode, TransportModes};
///
/// let filter = TransportModes::only(TransportMode::Tram).with(TransportMode::Bus);
/// assert!(filter.contains(TransportMode::Bus));
/// assert!(!filter.contains(TransportMode::Train));
/// assert_eq!(filter.to_string(), "tb");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransportModes(u8);

impl TransportModes {
    /// The empty set.
    pub const fn none() -> Self {
        TransportModes(0)
    }

    /// Every mode.
    pub fn all() -> Self {
        TransportMode::ALL.into_iter().collect()
    }

    /// A set containing a single mode.
    pub fn only(mode: TransportMode) -> Self {
        TransportModes(mode.bit())
    }

    /// Returns this set with `mode` added.
    pub fn with(self, mode: TransportMode) -> Self {
        TransportModes(self.0 | mode.bit())
    }

    pub fn contains(self, mode: TransportMode) -> bool {
        self.0 & mode.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = TransportMode> {
        TransportMode::ALL.into_iter().filter(move |m| self.contains(*m))
    }

    /// Parse a filter from a string of mode codes, e.g. `"tb"`.
    ///
    /// Returns the first unrecognised character on failure.
    pub fn parse_codes(codes: &str) -> Result<Self, char> {
        codes
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| TransportMode::from_code(c).ok_or(c))
            .collect()
    }
}

impl FromIterator<TransportMode> for TransportModes {
    fn from_iter<I: IntoIterator<Item = TransportMode>>(iter: I) -> Self {
        iter.into_iter().fold(TransportModes::none(), TransportModes::with)
    }
}

impl From<TransportMode> for TransportModes {
    fn from(mode: TransportMode) -> Self {
        TransportModes::only(mode)
    }
}

impl fmt::Debug for TransportModes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for TransportModes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for mode in self.iter() {
            write!(f, "{}", mode.code())?;
        }
        Ok(())
    }
}
