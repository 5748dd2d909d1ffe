//! Wall-clock arithmetic in the organization timezone, with DST resolution.
//!
//! Local times that fall in a spring-forward gap are shifted forward by the gap
//! length (02:30 becomes 03:30 in Europe/Paris). Local times repeated by a
//! fall-back transition resolve to the earlier of the two instants.

use chrono::{
    DateTime, Days, LocalResult, Months, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone,
    Utc,
};
use chrono_tz::Tz;

use crate::config::ORGANIZATION_TIMEZONE;

/// Resolve a wall-clock datetime to an instant in the organization timezone.
pub(crate) fn localize(naive: NaiveDateTime) -> DateTime<Tz> {
    match ORGANIZATION_TIMEZONE.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => shift_out_of_gap(naive),
    }
}

/// Interpret a non-existent local time with the offset in force before the gap.
fn shift_out_of_gap(naive: NaiveDateTime) -> DateTime<Tz> {
    let before_gap = naive - TimeDelta::hours(3);
    let offset_seconds = match ORGANIZATION_TIMEZONE.from_local_datetime(&before_gap) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
            dt.offset().fix().local_minus_utc()
        }
        LocalResult::None => 0,
    };
    let utc = naive - TimeDelta::seconds(i64::from(offset_seconds));
    Utc.from_utc_datetime(&utc).with_timezone(&ORGANIZATION_TIMEZONE)
}

/// Shift a date by a signed number of months, clamping the day to the target
/// month's length (Jan 31 + 1 month = Feb 28/29).
pub(crate) fn shift_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let magnitude = u32::try_from(months.unsigned_abs()).ok()?;
    if months >= 0 {
        date.checked_add_months(Months::new(magnitude))
    } else {
        date.checked_sub_months(Months::new(magnitude))
    }
}

pub(crate) fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

/// Move a datetime by whole calendar months and days, keeping its wall-clock
/// time. Returns `None` when the result leaves chrono's representable range.
pub(crate) fn plus_calendar(dt: &DateTime<Tz>, months: i64, days: i64) -> Option<DateTime<Tz>> {
    let local = dt.naive_local();
    let date = shift_months(local.date(), months)?;
    let date = shift_days(date, days)?;
    Some(localize(date.and_time(local.time())))
}
