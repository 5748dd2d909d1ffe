//! Unit vocabulary shared by dates and durations.
//!
//! Operation families disagree on which spellings they accept, so parsing comes
//! in three flavours:
//!
//! - [`Unit::parse_singular`]: comparisons, `set`, `get_units`, `has_same_units`
//! - [`Unit::parse_lenient`]: `start_of`/`end_of`, `diff`, duration field maps
//! - [`Unit::parse_plural`]: the deprecated `old_*` operations

use std::fmt;

use chrono::{DateTime, Datelike, TimeZone, Timelike};

use crate::error::{CompaniError, Result};

pub(crate) const MS_PER_SECOND: i64 = 1_000;
pub(crate) const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
pub(crate) const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
pub(crate) const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;
pub(crate) const MS_PER_WEEK: i64 = 7 * MS_PER_DAY;
pub(crate) const MS_PER_MONTH: i64 = 30 * MS_PER_DAY;
pub(crate) const MS_PER_YEAR: i64 = 365 * MS_PER_DAY;

/// A calendar or clock unit, ordered from largest to smallest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Unit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
}

impl Unit {
    pub const ALL: [Unit; 8] = [
        Unit::Year,
        Unit::Month,
        Unit::Week,
        Unit::Day,
        Unit::Hour,
        Unit::Minute,
        Unit::Second,
        Unit::Millisecond,
    ];

    pub fn singular(self) -> &'static str {
        match self {
            Unit::Year => "year",
            Unit::Month => "month",
            Unit::Week => "week",
            Unit::Day => "day",
            Unit::Hour => "hour",
            Unit::Minute => "minute",
            Unit::Second => "second",
            Unit::Millisecond => "millisecond",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Unit::Year => "years",
            Unit::Month => "months",
            Unit::Week => "weeks",
            Unit::Day => "days",
            Unit::Hour => "hours",
            Unit::Minute => "minutes",
            Unit::Second => "seconds",
            Unit::Millisecond => "milliseconds",
        }
    }

    /// Accepts only the singular spelling (`"day"`, not `"days"`).
    pub fn parse_singular(name: &str) -> Result<Unit> {
        Unit::ALL
            .into_iter()
            .find(|u| u.singular() == name)
            .ok_or_else(|| CompaniError::InvalidUnit(name.to_string()))
    }

    /// Accepts only the plural spelling (`"days"`, not `"day"`).
    pub fn parse_plural(name: &str) -> Result<Unit> {
        Unit::ALL
            .into_iter()
            .find(|u| u.plural() == name)
            .ok_or_else(|| CompaniError::InvalidUnit(name.to_string()))
    }

    /// Accepts either spelling.
    pub fn parse_lenient(name: &str) -> Result<Unit> {
        Unit::ALL
            .into_iter()
            .find(|u| u.singular() == name || u.plural() == name)
            .ok_or_else(|| CompaniError::InvalidUnit(name.to_string()))
    }

    /// Year, month, week and day have lengths that depend on calendar position.
    pub fn is_calendar(self) -> bool {
        matches!(self, Unit::Year | Unit::Month | Unit::Week | Unit::Day)
    }

    /// Length in milliseconds using fixed ratios (365-day year, 30-day month,
    /// 24-hour day). Only meaningful where no calendar anchor exists.
    pub fn fixed_millis(self) -> i64 {
        match self {
            Unit::Year => MS_PER_YEAR,
            Unit::Month => MS_PER_MONTH,
            Unit::Week => MS_PER_WEEK,
            Unit::Day => MS_PER_DAY,
            Unit::Hour => MS_PER_HOUR,
            Unit::Minute => MS_PER_MINUTE,
            Unit::Second => MS_PER_SECOND,
            Unit::Millisecond => 1,
        }
    }

    /// Numeric value of this component of a wall-clock datetime.
    /// `Week` reads the ISO week number.
    pub fn component<Tz: TimeZone>(self, dt: &DateTime<Tz>) -> i64 {
        match self {
            Unit::Year => i64::from(dt.year()),
            Unit::Month => i64::from(dt.month()),
            Unit::Week => i64::from(dt.iso_week().week()),
            Unit::Day => i64::from(dt.day()),
            Unit::Hour => i64::from(dt.hour()),
            Unit::Minute => i64::from(dt.minute()),
            Unit::Second => i64::from(dt.second()),
            Unit::Millisecond => i64::from(dt.timestamp_subsec_millis()),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}
