//! Wall-clock times with minute granularity.
//!
//! A [`TimeOfDay`] is stored as minutes since midnight and always rendered in
//! the canonical zero-padded `HH:MM` form, so the string and numeric orderings
//! agree within a day.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Number of minutes in a day; valid times are in `[0, MINUTES_PER_DAY)`.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

static TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d{1,2}):(\d{2})\s*$").unwrap());

/// Returned when a string is not a valid `HH:MM` time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid time of day {0:?}, expected HH:MM")]
pub struct TimeParseError(String);

/// A time of day, e.g. `08:00` or `14:45`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Creates a time from minutes since midnight.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    /// Creates a time from an hour (0-23) and minute (0-59).
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if minute >= 60 {
            return None;
        }
        Self::from_minutes(hour.checked_mul(60)?.checked_add(minute)?)
    }

    /// Creates a time from a signed minute count, clamping into the valid range.
    pub(crate) fn saturating_from_minutes(minutes: i32) -> Self {
        Self(minutes.clamp(0, i32::from(MINUTES_PER_DAY) - 1) as u16)
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Signed number of minutes from `self` to `later`.
    pub fn minutes_until(self, later: TimeOfDay) -> i32 {
        i32::from(later.0) - i32::from(self.0)
    }

    /// Formats the time for display on a 12-hour clock, e.g. `1:45 PM`.
    pub fn to_12_hour(self) -> String {
        let period = if self.hour() >= 12 { "PM" } else { "AM" };
        let hour = match self.hour() % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", hour, self.minute(), period)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = TIME_REGEX
            .captures(s)
            .ok_or_else(|| TimeParseError(s.to_string()))?;

        let hour: u16 = caps[1].parse().map_err(|_| TimeParseError(s.to_string()))?;
        let minute: u16 = caps[2].parse().map_err(|_| TimeParseError(s.to_string()))?;

        TimeOfDay::from_hm(hour, minute).ok_or_else(|| TimeParseError(s.to_string()))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
