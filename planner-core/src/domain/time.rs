//! Time of day for timetabled services.
//!
//! Timetables express times as "HH:MM" relative to the service day. Services
//! that run past midnight use hours 24-47 (as GTFS does), which we keep as a
//! next-day flag rather than wrapping, so that ordering stays chronological
//! within one service day.

use chrono::{NaiveTime, Timelike};
use std::cmp::Ordering;
use std::fmt;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Error returned when parsing or constructing an invalid time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A minute-resolution time within a service day.
///
/// # Examples
///
/// ```
/// use planner_core::domain::TimeOfDay;
///
/// let t = TimeOfDay::parse_hhmm("14:30").unwrap();
/// assert_eq!(t.to_string(), "14:30");
///
/// // Hours past 23 belong to the following day
/// let late = TimeOfDay::parse_hhmm("25:10").unwrap();
/// assert!(late.is_next_day());
/// assert_eq!(late.to_string(), "01:10+24");
/// assert!(late > t);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeOfDay {
    time: NaiveTime,
    next_day: bool,
}

impl TimeOfDay {
    /// A time on the service day itself. Returns `None` for out-of-range values.
    pub fn of(hour: u32, minute: u32) -> Option<Self> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
        Some(Self {
            time,
            next_day: false,
        })
    }

    /// A time on the day after the service day.
    pub fn next_day_of(hour: u32, minute: u32) -> Option<Self> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
        Some(Self {
            time,
            next_day: true,
        })
    }

    /// Midnight at the start of the service day.
    pub fn midnight() -> Self {
        Self {
            time: NaiveTime::default(),
            next_day: false,
        }
    }

    /// Parse a time from "HH:MM" format.
    ///
    /// Hours 24-47 are accepted and mean the following day.
    ///
    /// ```
    /// use planner_core::domain::TimeOfDay;
    ///
    /// assert!(TimeOfDay::parse_hhmm("00:00").is_ok());
    /// assert!(TimeOfDay::parse_hhmm("47:59").is_ok());
    ///
    /// assert!(TimeOfDay::parse_hhmm("1430").is_err());
    /// assert!(TimeOfDay::parse_hhmm("14:3").is_err());
    /// assert!(TimeOfDay::parse_hhmm("48:00").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        if s.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }

        let bytes = s.as_bytes();

        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 47 {
            return Err(TimeError::new("hour must be 0-47"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        Self::from_minutes(hour * 60 + minute).ok_or_else(|| TimeError::new("invalid time"))
    }

    /// Build from minutes since the start of the service day (0..2880).
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        if minutes >= 2 * MINUTES_PER_DAY {
            return None;
        }
        let next_day = minutes >= MINUTES_PER_DAY;
        let within = minutes % MINUTES_PER_DAY;
        let time = NaiveTime::from_hms_opt(within / 60, within % 60, 0)?;
        Some(Self { time, next_day })
    }

    /// Minutes since the start of the service day, counting the next day
    /// as 1440 onwards.
    pub fn minutes(&self) -> u32 {
        let base = self.time.hour() * 60 + self.time.minute();
        if self.next_day {
            base + MINUTES_PER_DAY
        } else {
            base
        }
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.time.minute()
    }

    /// Returns true if this time falls on the day after the service day.
    pub fn is_next_day(&self) -> bool {
        self.next_day
    }

    /// Returns the wall-clock time, ignoring the day.
    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// Add minutes, returning `None` if the result leaves the following day.
    pub fn checked_add_minutes(&self, minutes: u32) -> Option<Self> {
        Self::from_minutes(self.minutes().checked_add(minutes)?)
    }

    /// Subtract minutes, returning `None` before the start of the service day.
    pub fn checked_sub_minutes(&self, minutes: u32) -> Option<Self> {
        Self::from_minutes(self.minutes().checked_sub(minutes)?)
    }

    /// Signed minutes from `other` to `self`.
    pub fn minutes_since(&self, other: Self) -> i64 {
        i64::from(self.minutes()) - i64::from(other.minutes())
    }
}

impl Ord for TimeOfDay {
    fn cmp(&self, other: &Self) -> Ordering {
        self.minutes().cmp(&other.minutes())
    }
}

impl PartialOrd for TimeOfDay {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeOfDay({})", self)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())?;
        if self.next_day {
            f.write_str("+24")?;
        }
        Ok(())
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse_hhmm(s).unwrap()
    }

    #[test]
    fn parse_valid_times() {
        let time = t("00:00");
        assert_eq!((time.hour(), time.minute()), (0, 0));
        assert!(!time.is_next_day());

        let time = t("23:59");
        assert_eq!((time.hour(), time.minute()), (23, 59));

        let time = t("24:00");
        assert_eq!((time.hour(), time.minute()), (0, 0));
        assert!(time.is_next_day());
    }

    #[test]
    fn parse_invalid_format() {
        assert!(TimeOfDay::parse_hhmm("").is_err());
        assert!(TimeOfDay::parse_hhmm("1430").is_err());
        assert!(TimeOfDay::parse_hhmm("14:300").is_err());
        assert!(TimeOfDay::parse_hhmm("14-30").is_err());
        assert!(TimeOfDay::parse_hhmm("ab:cd").is_err());
        assert!(TimeOfDay::parse_hhmm("12:60").is_err());
        assert!(TimeOfDay::parse_hhmm("48:00").is_err());
    }

    #[test]
    fn of_and_next_day_of() {
        assert_eq!(TimeOfDay::of(9, 15), Some(t("09:15")));
        assert_eq!(TimeOfDay::next_day_of(1, 5), Some(t("25:05")));
        assert!(TimeOfDay::of(24, 0).is_none());
        assert!(TimeOfDay::of(10, 60).is_none());
    }

    #[test]
    fn minutes_roundtrip() {
        assert_eq!(t("00:00").minutes(), 0);
        assert_eq!(t("10:30").minutes(), 630);
        assert_eq!(t("24:30").minutes(), 1470);
        assert_eq!(TimeOfDay::from_minutes(1470), Some(t("24:30")));
        assert!(TimeOfDay::from_minutes(2880).is_none());
    }

    #[test]
    fn ordering_across_midnight() {
        assert!(t("23:59") < t("24:00"));
        assert!(t("00:10") < t("23:00"));
        assert!(TimeOfDay::next_day_of(0, 10).unwrap() > t("23:00"));
    }

    #[test]
    fn arithmetic() {
        assert_eq!(t("23:30").checked_add_minutes(45), Some(t("24:15")));
        assert_eq!(t("00:10").checked_sub_minutes(10), Some(TimeOfDay::midnight()));
        assert!(t("00:10").checked_sub_minutes(11).is_none());
        assert!(t("47:50").checked_add_minutes(10).is_none());
        assert_eq!(t("10:15").minutes_since(t("09:45")), 30);
        assert_eq!(t("09:45").minutes_since(t("10:15")), -30);
    }

    #[test]
    fn display_and_debug() {
        assert_eq!(t("07:05").to_string(), "07:05");
        assert_eq!(t("31:00").to_string(), "07:00+24");
        assert_eq!(format!("{:?}", t("07:05")), "TimeOfDay(07:05)");
    }
}
