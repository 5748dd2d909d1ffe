//! Points in time, interpreted in the organization timezone.
//!
//! `CompaniDate` wraps a `chrono` datetime pinned to
//! [`ORGANIZATION_TIMEZONE`] at millisecond precision. Every query reads the
//! organization wall clock; every manipulation returns a new value.
//!
//! Unit spelling rules differ per operation family (see [`crate::unit`]):
//! comparisons, `set` and component reads take singular names only,
//! `start_of`/`end_of`/`diff` take either spelling.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use chrono::format::{Item, StrftimeItems};
use chrono::{
    DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Offset, SubsecRound, TimeDelta,
    TimeZone, Timelike, Utc, Weekday,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::clock;
use crate::config::{LOCAL_ISO_FORMAT, ORGANIZATION_LOCALE, ORGANIZATION_TIMEZONE, UTC_ISO_FORMAT};
use crate::duration::CompaniDuration;
use crate::error::{CompaniError, Result};
use crate::iso;
use crate::unit::Unit;
use crate::zone::{localize, plus_calendar, shift_days, shift_months};

/// Fixed-date public holidays as (month, day).
const FIXED_HOLIDAYS: [(u32, u32); 8] = [
    (1, 1),   // Jour de l'an
    (5, 1),   // Fête du travail
    (5, 8),   // Victoire 1945
    (7, 14),  // Fête nationale
    (8, 15),  // Assomption
    (11, 1),  // Toussaint
    (11, 11), // Armistice
    (12, 25), // Noël
];

/// Easter Monday, Ascension and Whit Monday, in days after Easter Sunday.
const EASTER_HOLIDAY_OFFSETS: [i64; 3] = [1, 39, 50];

/// The shapes a date can be built from.
#[derive(Debug, Clone)]
pub enum DateInput {
    Date(CompaniDate),
    Native(DateTime<Utc>),
    Iso(String),
    /// A value and the strftime pattern it is written in.
    Formatted { value: String, format: String },
}

impl From<CompaniDate> for DateInput {
    fn from(date: CompaniDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<&CompaniDate> for DateInput {
    fn from(date: &CompaniDate) -> Self {
        DateInput::Date(*date)
    }
}

impl<T: TimeZone> From<DateTime<T>> for DateInput {
    fn from(dt: DateTime<T>) -> Self {
        DateInput::Native(dt.with_timezone(&Utc))
    }
}

impl From<SystemTime> for DateInput {
    fn from(time: SystemTime) -> Self {
        DateInput::Native(DateTime::<Utc>::from(time))
    }
}

impl From<&str> for DateInput {
    fn from(iso: &str) -> Self {
        DateInput::Iso(iso.to_string())
    }
}

impl From<String> for DateInput {
    fn from(iso: String) -> Self {
        DateInput::Iso(iso)
    }
}

impl From<(&str, &str)> for DateInput {
    fn from((value, format): (&str, &str)) -> Self {
        DateInput::Formatted {
            value: value.to_string(),
            format: format.to_string(),
        }
    }
}

/// An immutable point in time, displayed in the organization timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompaniDate {
    inner: DateTime<Tz>,
}

impl CompaniDate {
    // ---------------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------------

    /// The current instant, as reported by [`clock::now`].
    pub fn now() -> Self {
        Self::from_datetime(&clock::now())
    }

    /// Build a date from any accepted shape.
    ///
    /// # Errors
    /// Returns `CompaniError::InvalidDate` for empty or unparsable strings.
    pub fn new(input: impl Into<DateInput>) -> Result<Self> {
        match input.into() {
            DateInput::Date(date) => Ok(date),
            DateInput::Native(dt) => Ok(Self::from_datetime(&dt)),
            DateInput::Iso(iso) => Self::parse_iso(&iso),
            DateInput::Formatted { value, format } => Self::parse_with_format(&value, &format),
        }
    }

    pub fn from_datetime<T: TimeZone>(dt: &DateTime<T>) -> Self {
        Self {
            inner: dt.with_timezone(&ORGANIZATION_TIMEZONE).trunc_subsecs(3),
        }
    }

    /// Parse an ISO 8601 datetime in extended, basic, week, ordinal or
    /// reduced-precision form. Strings without an offset (including bare
    /// dates) are read as organization wall-clock time; missing fields take
    /// their minimum (`2021-11` is 1 November at local midnight).
    pub fn parse_iso(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(CompaniError::wrong_date_arguments());
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Ok(Self::from_datetime(&dt));
        }
        let parsed = iso::parse_datetime(input).ok_or_else(CompaniError::wrong_date_arguments)?;
        match parsed.offset {
            Some(offset) => offset
                .from_local_datetime(&parsed.local)
                .single()
                .map(|dt| Self::from_datetime(&dt))
                .ok_or_else(CompaniError::wrong_date_arguments),
            None => Ok(Self::from_datetime(&localize(parsed.local))),
        }
    }

    /// Parse a string written in an explicit strftime pattern. Without an offset
    /// in the pattern the value is organization wall-clock time; without a time
    /// it is local midnight.
    pub fn parse_with_format(value: &str, format: &str) -> Result<Self> {
        if value.trim().is_empty() || format.is_empty() {
            return Err(CompaniError::wrong_date_arguments());
        }
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Ok(Self::from_datetime(&dt));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Self::from_datetime(&localize(naive)));
        }
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(Self::from_datetime(&localize(date.and_time(NaiveTime::MIN))));
        }
        Err(CompaniError::wrong_date_arguments())
    }

    // ---------------------------------------------------------------------
    // Getters
    // ---------------------------------------------------------------------

    /// Wall-clock components for the requested singular unit names. Unknown
    /// names are dropped rather than rejected.
    pub fn get_units(&self, names: &[&str]) -> BTreeMap<Unit, i64> {
        names
            .iter()
            .filter_map(|name| Unit::parse_singular(name).ok())
            .map(|unit| (unit, unit.component(&self.inner)))
            .collect()
    }

    /// ISO weekday: 1 (Monday) through 7 (Sunday).
    pub fn weekday(&self) -> u32 {
        self.inner.weekday().number_from_monday()
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Strictly earlier at the given granularity (default: millisecond).
    pub fn is_before(&self, other: impl Into<DateInput>, unit: Option<&str>) -> Result<bool> {
        let (this, other) = self.truncated_pair(other, unit)?;
        Ok(this < other)
    }

    /// Strictly later at the given granularity (default: millisecond).
    pub fn is_after(&self, other: impl Into<DateInput>, unit: Option<&str>) -> Result<bool> {
        let (this, other) = self.truncated_pair(other, unit)?;
        Ok(this > other)
    }

    /// Same calendar `unit` (e.g. same day) in the organization timezone.
    pub fn is_same(&self, other: impl Into<DateInput>, unit: &str) -> Result<bool> {
        let (this, other) = self.truncated_pair(other, Some(unit))?;
        Ok(this == other)
    }

    pub fn is_same_or_before(
        &self,
        other: impl Into<DateInput>,
        unit: Option<&str>,
    ) -> Result<bool> {
        let (this, other) = self.truncated_pair(other, unit)?;
        Ok(this <= other)
    }

    pub fn is_same_or_after(
        &self,
        other: impl Into<DateInput>,
        unit: Option<&str>,
    ) -> Result<bool> {
        let (this, other) = self.truncated_pair(other, unit)?;
        Ok(this >= other)
    }

    /// `lower <= self <= upper` at the given granularity.
    pub fn is_same_or_between(
        &self,
        lower: impl Into<DateInput>,
        upper: impl Into<DateInput>,
        unit: Option<&str>,
    ) -> Result<bool> {
        let unit = granularity(unit)?;
        let lower = Self::new(lower)?.floor(unit);
        let upper = Self::new(upper)?.floor(unit);
        let this = self.floor(unit);
        Ok(lower <= this && this <= upper)
    }

    /// True when every named component matches, regardless of the others
    /// (e.g. same hour and minute on different days).
    pub fn has_same_units(&self, other: impl Into<DateInput>, units: &[&str]) -> Result<bool> {
        let units = units
            .iter()
            .map(|name| Unit::parse_singular(name))
            .collect::<Result<Vec<_>>>()?;
        let other = Self::new(other)?;
        Ok(units
            .into_iter()
            .all(|unit| unit.component(&self.inner) == unit.component(&other.inner)))
    }

    /// French public holiday, fixed-date or Easter-anchored.
    ///
    /// Easter Sunday and Whit Sunday fall on Sundays and are not counted.
    pub fn is_holiday(&self) -> bool {
        let date = self.inner.date_naive();
        if FIXED_HOLIDAYS.contains(&(date.month(), date.day())) {
            return true;
        }
        let Some(easter) = easter_sunday(date.year()) else {
            return false;
        };
        EASTER_HOLIDAY_OFFSETS
            .into_iter()
            .any(|offset| shift_days(easter, offset) == Some(date))
    }

    /// Monday to Friday, excluding public holidays.
    pub fn is_business_day(&self) -> bool {
        !matches!(self.inner.weekday(), Weekday::Sat | Weekday::Sun) && !self.is_holiday()
    }

    fn truncated_pair(
        &self,
        other: impl Into<DateInput>,
        unit: Option<&str>,
    ) -> Result<(DateTime<Tz>, DateTime<Tz>)> {
        let unit = granularity(unit)?;
        let other = Self::new(other)?;
        Ok((self.floor(unit), other.floor(unit)))
    }

    // ---------------------------------------------------------------------
    // Display
    // ---------------------------------------------------------------------

    /// Render with a strftime pattern in the organization timezone and locale
    /// (`"%A %d %B %Y"` → `"mercredi 24 novembre 2021"`).
    pub fn format(&self, pattern: &str) -> Result<String> {
        let items: Vec<Item<'_>> =
            StrftimeItems::new_with_locale(pattern, ORGANIZATION_LOCALE).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            return Err(CompaniError::InvalidArgument(format!(
                "unsupported format pattern {pattern:?}"
            )));
        }
        Ok(self
            .inner
            .format_localized_with_items(items.iter(), ORGANIZATION_LOCALE)
            .to_string())
    }

    pub fn to_date(&self) -> DateTime<Utc> {
        self.inner.with_timezone(&Utc)
    }

    /// UTC with millisecond precision: `2021-11-24T07:12:08.000Z`.
    pub fn to_iso(&self) -> String {
        self.to_date().format(UTC_ISO_FORMAT).to_string()
    }

    /// Organization offset with millisecond precision: `2021-11-24T08:12:08.000+01:00`.
    pub fn to_local_iso(&self) -> String {
        self.inner.format(LOCAL_ISO_FORMAT).to_string()
    }

    // ---------------------------------------------------------------------
    // Manipulation
    // ---------------------------------------------------------------------

    /// Start of the enclosing `unit` (singular or plural). Weeks start on Monday.
    pub fn start_of(&self, unit: &str) -> Result<Self> {
        let unit = Unit::parse_lenient(unit)?;
        Ok(Self {
            inner: self.floor(unit),
        })
    }

    /// Last millisecond of the enclosing `unit` (singular or plural).
    pub fn end_of(&self, unit: &str) -> Result<Self> {
        let unit = Unit::parse_lenient(unit)?;
        let start = self.floor(unit);
        let next = match unit {
            Unit::Year => plus_calendar(&start, 12, 0),
            Unit::Month => plus_calendar(&start, 1, 0),
            Unit::Week => plus_calendar(&start, 0, 7),
            Unit::Day => plus_calendar(&start, 0, 1),
            clock_unit => {
                start.checked_add_signed(TimeDelta::milliseconds(clock_unit.fixed_millis()))
            }
        }
        .ok_or_else(out_of_range)?;
        Ok(Self {
            inner: next - TimeDelta::milliseconds(1),
        })
    }

    /// Overwrite wall-clock fields. Keys are singular unit names; `week` sets the
    /// ISO week number and keeps the weekday. When `day` is not given, it is
    /// clamped to the target month's length.
    pub fn set(&self, fields: &[(&str, i64)]) -> Result<Self> {
        let local = self.inner.naive_local();
        let mut year = i64::from(local.year());
        let mut month = i64::from(local.month());
        let mut day = i64::from(local.day());
        let mut hour = i64::from(local.hour());
        let mut minute = i64::from(local.minute());
        let mut second = i64::from(local.second());
        let mut millisecond = i64::from(self.inner.timestamp_subsec_millis());
        let mut week = None;
        let mut day_given = false;

        for (name, value) in fields {
            match Unit::parse_singular(name)? {
                Unit::Year => year = *value,
                Unit::Month => month = *value,
                Unit::Week => week = Some(*value),
                Unit::Day => {
                    day = *value;
                    day_given = true;
                }
                Unit::Hour => hour = *value,
                Unit::Minute => minute = *value,
                Unit::Second => second = *value,
                Unit::Millisecond => millisecond = *value,
            }
        }

        let year = i32::try_from(year).map_err(|_| field_out_of_range(Unit::Year, year))?;
        let month = u32::try_from(month).map_err(|_| field_out_of_range(Unit::Month, month))?;
        let mut day = u32::try_from(day).map_err(|_| field_out_of_range(Unit::Day, day))?;
        if !day_given {
            let max_day = days_in_month(year, month)
                .ok_or_else(|| field_out_of_range(Unit::Month, month.into()))?;
            day = day.min(max_day);
        }

        let mut date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| CompaniError::InvalidDate(format!("no such day {year}-{month}-{day}")))?;
        if let Some(week) = week {
            let number = u32::try_from(week).map_err(|_| field_out_of_range(Unit::Week, week))?;
            date = NaiveDate::from_isoywd_opt(date.iso_week().year(), number, date.weekday())
                .ok_or_else(|| field_out_of_range(Unit::Week, week))?;
        }

        let to_u32 = |unit: Unit, value: i64| {
            u32::try_from(value).map_err(|_| field_out_of_range(unit, value))
        };
        // chrono reads 1000..=1999 as a leap second.
        if millisecond > 999 {
            return Err(field_out_of_range(Unit::Millisecond, millisecond));
        }
        let naive = date
            .and_hms_milli_opt(
                to_u32(Unit::Hour, hour)?,
                to_u32(Unit::Minute, minute)?,
                to_u32(Unit::Second, second)?,
                to_u32(Unit::Millisecond, millisecond)?,
            )
            .ok_or_else(|| {
                CompaniError::InvalidDate(format!(
                    "no such time {hour}:{minute}:{second}.{millisecond}"
                ))
            })?;

        Ok(Self::from_datetime(&localize(naive)))
    }

    /// Elapsed time from `other` to `self`, led by a whole count of `unit`.
    ///
    /// For calendar units (year, month, week, day) the count is the largest
    /// number of whole steps from the earlier date that does not pass the later
    /// one, honouring real month lengths and leap years. What remains is exact
    /// elapsed seconds, so a DST day contributes 23 or 25 hours. Clock units
    /// (hour, minute, second, millisecond) split the exact elapsed time.
    ///
    /// The result is negative when `self` is earlier than `other`:
    ///
    /// ```rust
    /// use compani_dates::CompaniDate;
    ///
    /// let may = CompaniDate::new("2021-05-31T00:00:00.000Z").unwrap();
    /// let diff = may.diff("2021-04-30T00:00:00.000Z", "months").unwrap();
    /// assert_eq!(diff.to_iso(), "P1MT86400S");
    /// ```
    pub fn diff(&self, other: impl Into<DateInput>, unit: &str) -> Result<CompaniDuration> {
        let unit = Unit::parse_lenient(unit)?;
        let other = Self::new(other)?;
        let duration = if unit.is_calendar() {
            calendar_diff(&self.inner, &other.inner, unit)?
        } else {
            clock_diff(&self.inner, &other.inner, unit)
        };
        tracing::trace!(from = %other, to = %self, %unit, result = %duration, "diff");
        Ok(duration)
    }

    /// Apply an ISO 8601 duration literal. Only strings are accepted.
    pub fn add(&self, iso_duration: &str) -> Result<Self> {
        let duration = CompaniDuration::parse_iso(iso_duration)?;
        self.plus(&duration)
    }

    /// Apply the negation of an ISO 8601 duration literal.
    pub fn subtract(&self, iso_duration: &str) -> Result<Self> {
        let duration = CompaniDuration::parse_iso(iso_duration)?;
        self.plus(&duration.negate()?)
    }

    /// Calendar components move the wall clock (clamping month ends), then
    /// clock components move the instant.
    pub(crate) fn plus(&self, duration: &CompaniDuration) -> Result<Self> {
        let months = duration.calendar_months().ok_or_else(out_of_range)?;
        let days = duration.calendar_days().ok_or_else(out_of_range)?;
        let millis = duration.clock_milliseconds().ok_or_else(out_of_range)?;

        let shifted = if months == 0 && days == 0 {
            self.inner
        } else {
            plus_calendar(&self.inner, months, days).ok_or_else(out_of_range)?
        };
        let moved = TimeDelta::try_milliseconds(millis)
            .and_then(|delta| shifted.checked_add_signed(delta))
            .ok_or_else(out_of_range)?;
        Ok(Self { inner: moved })
    }

    /// Start of `unit` in the organization timezone.
    fn floor(&self, unit: Unit) -> DateTime<Tz> {
        let local = self.inner.naive_local();
        let date = local.date();
        let midnight = |d: Option<NaiveDate>| localize(d.unwrap_or(date).and_time(NaiveTime::MIN));

        match unit {
            Unit::Year => midnight(NaiveDate::from_ymd_opt(date.year(), 1, 1)),
            Unit::Month => midnight(NaiveDate::from_ymd_opt(date.year(), date.month(), 1)),
            Unit::Week => midnight(shift_days(
                date,
                -i64::from(date.weekday().num_days_from_monday()),
            )),
            Unit::Day => midnight(Some(date)),
            clock_unit => {
                // Truncate on the local timeline but keep the offset, so the
                // repeated hour of a fall-back transition stays on its own side.
                let offset_ms = i64::from(self.inner.offset().fix().local_minus_utc()) * 1000;
                let local_ms = self.inner.timestamp_millis() + offset_ms;
                let floored = local_ms - local_ms.rem_euclid(clock_unit.fixed_millis());
                DateTime::from_timestamp_millis(floored - offset_ms)
                    .map(|utc| utc.with_timezone(&ORGANIZATION_TIMEZONE))
                    .unwrap_or(self.inner)
            }
        }
    }
}

fn granularity(unit: Option<&str>) -> Result<Unit> {
    unit.map_or(Ok(Unit::Millisecond), Unit::parse_singular)
}

pub(crate) fn out_of_range() -> CompaniError {
    CompaniError::InvalidDate("result out of range".to_string())
}

fn field_out_of_range(unit: Unit, value: i64) -> CompaniError {
    CompaniError::InvalidDate(format!("{unit} out of range: {value}"))
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = shift_months(first, 1)?;
    u32::try_from((next - first).num_days()).ok()
}

fn split_millis(duration: CompaniDuration, millis: i64) -> CompaniDuration {
    duration
        .with(Unit::Second, millis / 1000)
        .with(Unit::Millisecond, millis % 1000)
}

fn clock_diff(to: &DateTime<Tz>, from: &DateTime<Tz>, unit: Unit) -> CompaniDuration {
    let elapsed = (*to - *from).num_milliseconds();
    match unit {
        Unit::Hour | Unit::Minute => {
            let size = unit.fixed_millis();
            split_millis(CompaniDuration::zero().with(unit, elapsed / size), elapsed % size)
        }
        _ => split_millis(CompaniDuration::zero(), elapsed),
    }
}

fn calendar_diff(to: &DateTime<Tz>, from: &DateTime<Tz>, unit: Unit) -> Result<CompaniDuration> {
    let (earlier, later, negative) = if to >= from {
        (from, to, false)
    } else {
        (to, from, true)
    };
    let (count, cursor) = calendar_steps(earlier, later, unit).ok_or_else(out_of_range)?;
    let leftover = (*later - cursor).num_milliseconds();
    let duration = split_millis(CompaniDuration::zero().with(unit, count), leftover);
    if negative {
        duration.negate()
    } else {
        Ok(duration)
    }
}

/// Largest whole number of `unit` steps from `earlier` that stays at or before
/// `later`, with the point reached.
fn calendar_steps(
    earlier: &DateTime<Tz>,
    later: &DateTime<Tz>,
    unit: Unit,
) -> Option<(i64, DateTime<Tz>)> {
    let from = earlier.naive_local();
    let to = later.naive_local();
    let elapsed_days = (to.date() - from.date()).num_days();
    let (mut count, months_per_step, days_per_step) = match unit {
        Unit::Year => (i64::from(to.year() - from.year()), 12, 0),
        Unit::Month => (
            i64::from(to.year() - from.year()) * 12 + i64::from(to.month())
                - i64::from(from.month()),
            1,
            0,
        ),
        Unit::Week => (elapsed_days / 7, 0, 7),
        _ => (elapsed_days, 0, 1),
    };

    loop {
        if count <= 0 {
            return Some((0, *earlier));
        }
        let cursor = plus_calendar(earlier, count * months_per_step, count * days_per_step)?;
        if cursor <= *later {
            return Some((count, cursor));
        }
        count -= 1;
    }
}

/// Gregorian Easter Sunday (anonymous computus).
fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b.div_euclid(4);
    let e = b.rem_euclid(4);
    let f = (b + 8).div_euclid(25);
    let g = (b - f + 1).div_euclid(3);
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c.div_euclid(4);
    let k = c.rem_euclid(4);
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l).div_euclid(451);
    let month = (h + l - 7 * m + 114).div_euclid(31);
    let day = (h + l - 7 * m + 114).rem_euclid(31) + 1;
    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

impl fmt::Display for CompaniDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso())
    }
}

impl FromStr for CompaniDate {
    type Err = CompaniError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_iso(s)
    }
}

impl TryFrom<String> for CompaniDate {
    type Error = CompaniError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse_iso(&value)
    }
}

impl From<CompaniDate> for String {
    fn from(date: CompaniDate) -> Self {
        date.to_iso()
    }
}
