//! ISO 8601 datetime strings beyond RFC 3339.
//!
//! Accepts extended (`2021-11-24T07:12:08`) and basic (`20211124T071208`)
//! layouts, week dates (`2021-W47-3`), ordinal dates (`2021-328`), reduced
//! precision (`2021`, `2021-11`, `T07`), decimal fractions on the last time
//! component, and `Z`, `±HH`, `±HHMM` or `±HH:MM` offsets. Missing fields take
//! their minimum: January, day 1, Monday, midnight.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Weekday};

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// A parsed datetime: wall-clock fields plus the offset, if one was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IsoDateTime {
    pub local: NaiveDateTime,
    pub offset: Option<FixedOffset>,
}

pub(crate) fn parse_datetime(input: &str) -> Option<IsoDateTime> {
    // Fields are sliced by byte position below.
    if !input.is_ascii() {
        return None;
    }
    let (date_part, time_part) = match input.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (input, None),
    };

    let (date, complete) = parse_date(date_part)?;
    let Some(time_part) = time_part else {
        return Some(IsoDateTime {
            local: date.and_time(NaiveTime::MIN),
            offset: None,
        });
    };
    // A time of day needs a full calendar, ordinal or week date.
    if !complete {
        return None;
    }

    let (clock, offset) = split_offset(time_part)?;
    Some(IsoDateTime {
        local: date.and_time(parse_time(clock)?),
        offset,
    })
}

/// The date and whether it names a single day.
fn parse_date(part: &str) -> Option<(NaiveDate, bool)> {
    if part.contains('-') {
        parse_extended_date(part)
    } else {
        parse_basic_date(part)
    }
}

fn parse_extended_date(part: &str) -> Option<(NaiveDate, bool)> {
    let fields: Vec<&str> = part.split('-').collect();
    let year = year(fields[0])?;
    match fields[1..] {
        [week] if week.starts_with('W') => Some((week_date(year, &week[1..], "1")?, false)),
        [month] if month.len() == 2 => {
            Some((NaiveDate::from_ymd_opt(year, number(month, 2)?, 1)?, false))
        }
        [ordinal] => Some((NaiveDate::from_yo_opt(year, number(ordinal, 3)?)?, true)),
        [week, day] if week.starts_with('W') => Some((week_date(year, &week[1..], day)?, true)),
        [month, day] => Some((
            NaiveDate::from_ymd_opt(year, number(month, 2)?, number(day, 2)?)?,
            true,
        )),
        _ => None,
    }
}

fn parse_basic_date(part: &str) -> Option<(NaiveDate, bool)> {
    if part.len() < 4 {
        return None;
    }
    let (year_digits, rest) = part.split_at(4);
    let year = year(year_digits)?;
    if let Some(week) = rest.strip_prefix('W') {
        return match week.len() {
            2 => Some((week_date(year, week, "1")?, false)),
            3 => Some((week_date(year, &week[..2], &week[2..])?, true)),
            _ => None,
        };
    }
    match rest.len() {
        0 => Some((NaiveDate::from_ymd_opt(year, 1, 1)?, false)),
        3 => Some((NaiveDate::from_yo_opt(year, number(rest, 3)?)?, true)),
        4 => Some((
            NaiveDate::from_ymd_opt(year, number(&rest[..2], 2)?, number(&rest[2..], 2)?)?,
            true,
        )),
        _ => None,
    }
}

fn week_date(year: i32, week: &str, day: &str) -> Option<NaiveDate> {
    let weekday = *WEEKDAYS.get(usize::try_from(number(day, 1)?).ok()?.checked_sub(1)?)?;
    NaiveDate::from_isoywd_opt(year, number(week, 2)?, weekday)
}

/// Split a trailing `Z` or numeric offset off the time of day.
fn split_offset(part: &str) -> Option<(&str, Option<FixedOffset>)> {
    if let Some(clock) = part.strip_suffix('Z') {
        return Some((clock, FixedOffset::east_opt(0)));
    }
    let Some(at) = part.rfind(['+', '-']) else {
        return Some((part, None));
    };
    let (clock, offset) = part.split_at(at);
    let sign = if offset.starts_with('-') { -1 } else { 1 };
    let digits = &offset[1..];
    let (hours, minutes) = match digits.len() {
        2 => (number(digits, 2)?, 0),
        4 => (number(&digits[..2], 2)?, number(&digits[2..], 2)?),
        5 if digits.as_bytes()[2] == b':' => (number(&digits[..2], 2)?, number(&digits[3..], 2)?),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    let seconds = i32::try_from(hours * 3600 + minutes * 60).ok()?;
    Some((clock, Some(FixedOffset::east_opt(sign * seconds)?)))
}

/// `HH`, `HH:MM`, `HH:MM:SS` or their basic forms, with an optional decimal
/// fraction of the last component.
fn parse_time(part: &str) -> Option<NaiveTime> {
    let (main, fraction) = match part.find(['.', ',']) {
        Some(i) => (&part[..i], Some(&part[i + 1..])),
        None => (part, None),
    };

    let fields: Vec<&str> = if main.contains(':') {
        main.split(':').collect()
    } else {
        match main.len() {
            2 => vec![main],
            4 => vec![&main[..2], &main[2..]],
            6 => vec![&main[..2], &main[2..4], &main[4..]],
            _ => return None,
        }
    };
    let values = fields
        .iter()
        .map(|field| number(field, 2))
        .collect::<Option<Vec<u32>>>()?;
    let (hour, minute, second) = match values[..] {
        [h] => (h, 0, 0),
        [h, m] => (h, m, 0),
        [h, m, s] => (h, m, s),
        _ => return None,
    };
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;

    let Some(fraction) = fraction else {
        return Some(time);
    };
    if fraction.is_empty() || fraction.len() > 9 || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let unit_seconds: i64 = match values.len() {
        1 => 3600,
        2 => 60,
        _ => 1,
    };
    // Nanoseconds per unit of the last component, read as a 9-digit fraction.
    let numerator: i64 = format!("{fraction:0<9}").parse().ok()?;
    Some(time + TimeDelta::nanoseconds(numerator * unit_seconds))
}

fn year(digits: &str) -> Option<i32> {
    i32::try_from(number(digits, 4)?).ok()
}

/// Exactly `len` ASCII digits.
fn number(digits: &str, len: usize) -> Option<u32> {
    if digits.len() != len || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
