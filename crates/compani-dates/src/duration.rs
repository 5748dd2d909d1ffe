//! Elapsed amounts of time, stored as signed calendar components.
//!
//! A `CompaniDuration` has no calendar anchor, so every conversion to a single
//! magnitude (comparison, `as_*`, `format`) uses fixed ratios: 365-day years,
//! 30-day months, 7-day weeks and 24-hour days. Calendar-exact arithmetic only
//! happens when a duration is applied to a [`CompaniDate`](crate::CompaniDate).

use std::fmt::{self, Write as _};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CompaniError, Result};
use crate::unit::{Unit, MS_PER_MINUTE, MS_PER_SECOND};

/// Display style for [`CompaniDuration::format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationFormat {
    /// `5h16`, `13h`, `0h34`, `0h`
    #[default]
    Short,
    /// `5h 16min`, `13h`, `7min`, `0min`
    Long,
}

/// Whole hours and remaining minutes of a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursAndMinutes {
    pub hours: i64,
    pub minutes: i64,
}

/// The shapes a duration can be built from.
#[derive(Debug, Clone)]
pub enum DurationInput {
    Duration(CompaniDuration),
    Iso(String),
    /// Unit name (singular or plural) to magnitude.
    Fields(Vec<(String, i64)>),
}

impl From<CompaniDuration> for DurationInput {
    fn from(duration: CompaniDuration) -> Self {
        DurationInput::Duration(duration)
    }
}

impl From<&CompaniDuration> for DurationInput {
    fn from(duration: &CompaniDuration) -> Self {
        DurationInput::Duration(*duration)
    }
}

impl From<&str> for DurationInput {
    fn from(iso: &str) -> Self {
        DurationInput::Iso(iso.to_string())
    }
}

impl From<String> for DurationInput {
    fn from(iso: String) -> Self {
        DurationInput::Iso(iso)
    }
}

impl From<Vec<(String, i64)>> for DurationInput {
    fn from(fields: Vec<(String, i64)>) -> Self {
        DurationInput::Fields(fields)
    }
}

impl From<&[(&str, i64)]> for DurationInput {
    fn from(fields: &[(&str, i64)]) -> Self {
        DurationInput::Fields(fields.iter().map(|(k, v)| (k.to_string(), *v)).collect())
    }
}

impl<const N: usize> From<[(&str, i64); N]> for DurationInput {
    fn from(fields: [(&str, i64); N]) -> Self {
        DurationInput::from(&fields[..])
    }
}

/// An immutable, possibly negative, amount of elapsed time.
///
/// Components are signed independently, so `P-1DT32H4M-32S` is representable.
/// Two durations are *equivalent* when their total millisecond magnitudes match,
/// whatever their component breakdown.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompaniDuration {
    years: i64,
    months: i64,
    weeks: i64,
    days: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
    milliseconds: i64,
}

impl CompaniDuration {
    /// The zero duration (`PT0S`).
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build a duration from any accepted shape.
    ///
    /// # Errors
    /// Returns `CompaniError::InvalidUnit` for an unknown field name and
    /// `CompaniError::InvalidDuration` for a malformed ISO literal.
    pub fn new(input: impl Into<DurationInput>) -> Result<Self> {
        match input.into() {
            DurationInput::Duration(duration) => Ok(duration),
            DurationInput::Iso(iso) => Self::parse_iso(&iso),
            DurationInput::Fields(fields) => Self::from_fields(&fields),
        }
    }

    /// Parse an ISO 8601 duration (`P1Y2M5DT3H4M2S`, `PT0.5S`, `P-1DT32H`).
    ///
    /// Components must appear in canonical order (Y, M, W, D, then T, H, M, S),
    /// each at most once. The last component may carry a decimal fraction,
    /// which is converted under the fixed ratios and stored as seconds and
    /// milliseconds (`PT1.5H` is one hour and 1800 seconds). Digits beyond
    /// millisecond precision are truncated.
    pub fn parse_iso(input: &str) -> Result<Self> {
        parse_iso_duration(input).ok_or_else(|| CompaniError::unparsable_duration(input))
    }

    fn from_fields(fields: &[(String, i64)]) -> Result<Self> {
        let mut duration = Self::zero();
        for (name, value) in fields {
            let unit = Unit::parse_lenient(name)?;
            let slot = duration.slot_mut(unit);
            *slot = slot.checked_add(*value).ok_or_else(overflow)?;
        }
        Ok(duration)
    }

    /// Signed magnitude of one component, as stored.
    pub fn get(&self, unit: Unit) -> i64 {
        match unit {
            Unit::Year => self.years,
            Unit::Month => self.months,
            Unit::Week => self.weeks,
            Unit::Day => self.days,
            Unit::Hour => self.hours,
            Unit::Minute => self.minutes,
            Unit::Second => self.seconds,
            Unit::Millisecond => self.milliseconds,
        }
    }

    fn slot_mut(&mut self, unit: Unit) -> &mut i64 {
        match unit {
            Unit::Year => &mut self.years,
            Unit::Month => &mut self.months,
            Unit::Week => &mut self.weeks,
            Unit::Day => &mut self.days,
            Unit::Hour => &mut self.hours,
            Unit::Minute => &mut self.minutes,
            Unit::Second => &mut self.seconds,
            Unit::Millisecond => &mut self.milliseconds,
        }
    }

    pub(crate) fn with(mut self, unit: Unit, value: i64) -> Self {
        *self.slot_mut(unit) = value;
        self
    }

    /// Every component multiplied by `factor`, or `None` on overflow.
    pub(crate) fn scaled(&self, factor: i64) -> Option<Self> {
        let mut scaled = *self;
        for unit in Unit::ALL {
            let slot = scaled.slot_mut(unit);
            *slot = slot.checked_mul(factor)?;
        }
        Some(scaled)
    }

    /// Total magnitude in milliseconds under the fixed ratios.
    pub fn total_milliseconds(&self) -> i128 {
        Unit::ALL
            .into_iter()
            .map(|unit| i128::from(self.get(unit)) * i128::from(unit.fixed_millis()))
            .sum()
    }

    pub fn is_zero(&self) -> bool {
        self.total_milliseconds() == 0
    }

    /// Years and months folded into months, for calendar application.
    pub(crate) fn calendar_months(&self) -> Option<i64> {
        self.years.checked_mul(12)?.checked_add(self.months)
    }

    /// Weeks and days folded into days, for calendar application.
    pub(crate) fn calendar_days(&self) -> Option<i64> {
        self.weeks.checked_mul(7)?.checked_add(self.days)
    }

    /// Hours through milliseconds as exact elapsed milliseconds.
    pub(crate) fn clock_milliseconds(&self) -> Option<i64> {
        [Unit::Hour, Unit::Minute, Unit::Second, Unit::Millisecond]
            .into_iter()
            .try_fold(0i64, |acc, unit| {
                self.get(unit)
                    .checked_mul(unit.fixed_millis())
                    .and_then(|ms| acc.checked_add(ms))
            })
    }

    // ---------------------------------------------------------------------
    // Display
    // ---------------------------------------------------------------------

    /// Flatten to hours and minutes and render as `5h16` / `5h 16min`.
    ///
    /// Seconds are truncated. Negative durations are rendered with a leading `-`.
    pub fn format(&self, kind: DurationFormat) -> String {
        let total_minutes = self.total_milliseconds() / i128::from(MS_PER_MINUTE);
        let sign = if total_minutes < 0 { "-" } else { "" };
        let hours = total_minutes.unsigned_abs() / 60;
        let minutes = total_minutes.unsigned_abs() % 60;

        match kind {
            DurationFormat::Short if minutes == 0 => format!("{sign}{hours}h"),
            DurationFormat::Short => format!("{sign}{hours}h{minutes:02}"),
            DurationFormat::Long if hours == 0 => format!("{sign}{minutes}min"),
            DurationFormat::Long if minutes == 0 => format!("{sign}{hours}h"),
            DurationFormat::Long => format!("{sign}{hours}h {minutes}min"),
        }
    }

    /// Canonical ISO 8601 literal. Any zero-magnitude duration is `PT0S`.
    pub fn to_iso(&self) -> String {
        if self.is_zero() {
            return "PT0S".to_string();
        }

        let mut out = String::from("P");
        for (value, designator) in [
            (self.years, 'Y'),
            (self.months, 'M'),
            (self.weeks, 'W'),
            (self.days, 'D'),
        ] {
            if value != 0 {
                let _ = write!(out, "{value}{designator}");
            }
        }

        let second_millis = i128::from(self.seconds) * i128::from(MS_PER_SECOND)
            + i128::from(self.milliseconds);
        if self.hours != 0 || self.minutes != 0 || second_millis != 0 {
            out.push('T');
            if self.hours != 0 {
                let _ = write!(out, "{}H", self.hours);
            }
            if self.minutes != 0 {
                let _ = write!(out, "{}M", self.minutes);
            }
            if second_millis != 0 {
                let _ = write!(out, "{}S", format_seconds(second_millis));
            }
        }
        out
    }

    pub fn to_hours_and_minutes(&self) -> HoursAndMinutes {
        let total_seconds = self.total_milliseconds() / i128::from(MS_PER_SECOND);
        HoursAndMinutes {
            hours: saturate(total_seconds / 3600),
            minutes: saturate((total_seconds % 3600) / 60),
        }
    }

    // ---------------------------------------------------------------------
    // Conversions
    // ---------------------------------------------------------------------

    fn as_unit(&self, unit: Unit) -> f64 {
        self.total_milliseconds() as f64 / unit.fixed_millis() as f64
    }

    pub fn as_years(&self) -> f64 {
        self.as_unit(Unit::Year)
    }

    pub fn as_months(&self) -> f64 {
        self.as_unit(Unit::Month)
    }

    pub fn as_weeks(&self) -> f64 {
        self.as_unit(Unit::Week)
    }

    pub fn as_days(&self) -> f64 {
        self.as_unit(Unit::Day)
    }

    pub fn as_hours(&self) -> f64 {
        self.as_unit(Unit::Hour)
    }

    pub fn as_minutes(&self) -> f64 {
        self.as_unit(Unit::Minute)
    }

    pub fn as_seconds(&self) -> f64 {
        self.as_unit(Unit::Second)
    }

    // ---------------------------------------------------------------------
    // Arithmetic
    // ---------------------------------------------------------------------

    /// Component-wise sum with any accepted duration shape.
    pub fn add(&self, other: impl Into<DurationInput>) -> Result<Self> {
        let other = Self::new(other)?;
        let mut sum = *self;
        for unit in Unit::ALL {
            let slot = sum.slot_mut(unit);
            *slot = slot.checked_add(other.get(unit)).ok_or_else(overflow)?;
        }
        Ok(sum)
    }

    /// Every component with its sign flipped.
    ///
    /// # Errors
    /// Returns `CompaniError::InvalidDuration` when a component is `i64::MIN`.
    pub fn negate(&self) -> Result<Self> {
        let mut negated = *self;
        for unit in Unit::ALL {
            let slot = negated.slot_mut(unit);
            *slot = slot.checked_neg().ok_or_else(overflow)?;
        }
        Ok(negated)
    }

    /// Same components when the total is non-negative, all signs flipped otherwise.
    pub fn abs(&self) -> Result<Self> {
        if self.total_milliseconds() < 0 {
            self.negate()
        } else {
            Ok(*self)
        }
    }

    // ---------------------------------------------------------------------
    // Comparison
    // ---------------------------------------------------------------------

    pub fn is_equivalent_to(&self, other: impl Into<DurationInput>) -> Result<bool> {
        let other = Self::new(other)?;
        Ok(self.total_milliseconds() == other.total_milliseconds())
    }

    pub fn is_longer_than(&self, other: impl Into<DurationInput>) -> Result<bool> {
        let other = Self::new(other)?;
        Ok(self.total_milliseconds() > other.total_milliseconds())
    }

    pub fn is_shorter_than(&self, other: impl Into<DurationInput>) -> Result<bool> {
        let other = Self::new(other)?;
        Ok(self.total_milliseconds() < other.total_milliseconds())
    }
}

impl fmt::Display for CompaniDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso())
    }
}

impl FromStr for CompaniDuration {
    type Err = CompaniError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_iso(s)
    }
}

impl TryFrom<String> for CompaniDuration {
    type Error = CompaniError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse_iso(&value)
    }
}

impl From<CompaniDuration> for String {
    fn from(duration: CompaniDuration) -> Self {
        duration.to_iso()
    }
}

fn overflow() -> CompaniError {
    CompaniError::InvalidDuration("component overflow".to_string())
}

fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

/// `1500` → `1.5`, `-500` → `-0.5`, `86400000` → `86400`.
fn format_seconds(millis: i128) -> String {
    let sign = if millis < 0 { "-" } else { "" };
    let magnitude = millis.unsigned_abs();
    let whole = magnitude / 1000;
    let fraction = magnitude % 1000;
    if fraction == 0 {
        format!("{sign}{whole}")
    } else {
        let digits = format!("{fraction:03}");
        format!("{sign}{whole}.{}", digits.trim_end_matches('0'))
    }
}

const DATE_DESIGNATORS: [(char, Unit); 4] = [
    ('Y', Unit::Year),
    ('M', Unit::Month),
    ('W', Unit::Week),
    ('D', Unit::Day),
];

const TIME_DESIGNATORS: [(char, Unit); 3] =
    [('H', Unit::Hour), ('M', Unit::Minute), ('S', Unit::Second)];

fn parse_iso_duration(input: &str) -> Option<CompaniDuration> {
    let (negated, rest) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    let rest = rest.strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut components = parse_segment(date_part, &DATE_DESIGNATORS)?;
    if let Some(time) = time_part {
        let in_time = parse_segment(time, &TIME_DESIGNATORS)?;
        // `PT` with nothing after it is malformed.
        if in_time.is_empty() {
            return None;
        }
        components.extend(in_time);
    }

    let (last, leading) = components.split_last()?;
    // Only the lowest-order component may carry a fraction.
    if leading.iter().any(|c| c.fraction_millis.is_some()) {
        return None;
    }

    let mut duration = CompaniDuration::zero();
    for component in &components {
        *duration.slot_mut(component.unit) = component.whole;
    }
    if let Some(millis) = last.fraction_millis {
        duration.seconds = duration.seconds.checked_add(millis / MS_PER_SECOND)?;
        duration.milliseconds = millis % MS_PER_SECOND;
    }

    if negated {
        duration.negate().ok()
    } else {
        Some(duration)
    }
}

/// One `<number><designator>` pair of a duration literal.
struct Component {
    unit: Unit,
    whole: i64,
    /// Fractional part under the fixed ratios, in milliseconds, signed like `whole`.
    fraction_millis: Option<i64>,
}

/// Parse `<number><designator>` pairs, enforcing canonical order.
fn parse_segment(segment: &str, designators: &[(char, Unit)]) -> Option<Vec<Component>> {
    let mut rest = segment;
    let mut next_allowed = 0;
    let mut components = Vec::new();

    while !rest.is_empty() {
        let end = rest.find(|c: char| c.is_ascii_alphabetic())?;
        let (number, tail) = rest.split_at(end);
        let mut chars = tail.chars();
        let designator = chars.next()?;
        rest = chars.as_str();

        let position = designators[next_allowed..]
            .iter()
            .position(|(d, _)| *d == designator)?
            + next_allowed;
        next_allowed = position + 1;

        let unit = designators[position].1;
        let (whole, fraction_millis) = parse_number(number, unit)?;
        components.push(Component {
            unit,
            whole,
            fraction_millis,
        });
    }

    Some(components)
}

/// Parse `-?digits([.,]digits)?` into whole units and the fraction of one
/// `unit` in milliseconds. Digits beyond millisecond precision are truncated.
fn parse_number(number: &str, unit: Unit) -> Option<(i64, Option<i64>)> {
    let (int_part, fraction) = match number.find(['.', ',']) {
        Some(i) => (&number[..i], Some(&number[i + 1..])),
        None => (number, None),
    };
    let negative = int_part.starts_with('-');
    let digits = int_part.strip_prefix('-').unwrap_or(int_part);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let magnitude: i64 = digits.parse().ok()?;
    let sign = if negative { -1 } else { 1 };

    let fraction_millis = match fraction {
        None => None,
        Some(fraction) => {
            if fraction.is_empty()
                || fraction.len() > 9
                || !fraction.bytes().all(|b| b.is_ascii_digit())
            {
                return None;
            }
            let numerator: i128 = fraction.parse().ok()?;
            let scale = 10i128.pow(u32::try_from(fraction.len()).ok()?);
            let millis = numerator * i128::from(unit.fixed_millis()) / scale;
            Some(sign * i64::try_from(millis).ok()?)
        }
    };

    Some((sign * magnitude, fraction_millis))
}
