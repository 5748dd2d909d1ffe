//! Deprecated calendar-naive operations kept for existing callers.
//!
//! These work on fixed unit lengths (365-day years, 30-day months, 24-hour
//! days) and take plural-keyed JSON objects, unlike `diff`/`add`/`subtract`.

use chrono::TimeDelta;
use serde_json::{Map, Value};

use crate::args::json_kind;
use crate::date::{out_of_range, CompaniDate, DateInput};
use crate::error::{CompaniError, Result};
use crate::unit::Unit;

impl CompaniDate {
    /// `{ <unit>: elapsed }` using fixed unit lengths, truncated toward zero
    /// unless `float` is set.
    #[deprecated(note = "calendar-naive; use `CompaniDate::diff`")]
    pub fn old_diff(&self, other: impl Into<DateInput>, unit: &str, float: bool) -> Result<Value> {
        let parsed = Unit::parse_lenient(unit)?;
        let other = Self::new(other)?;
        let elapsed = (self.to_date() - other.to_date()).num_milliseconds();
        let ratio = elapsed as f64 / parsed.fixed_millis() as f64;
        let value = if float {
            Value::from(ratio)
        } else {
            Value::from(ratio.trunc() as i64)
        };

        let mut out = Map::new();
        out.insert(unit.to_string(), value);
        Ok(Value::Object(out))
    }

    /// Add a plural-keyed object such as `{"days": 2, "hours": 3}` as fixed
    /// milliseconds.
    #[deprecated(note = "calendar-naive; use `CompaniDate::add` with an ISO 8601 duration")]
    pub fn old_add(&self, amount: &Value) -> Result<Self> {
        self.shift_fixed(amount, 1.0)
    }

    #[deprecated(note = "calendar-naive; use `CompaniDate::subtract` with an ISO 8601 duration")]
    pub fn old_subtract(&self, amount: &Value) -> Result<Self> {
        self.shift_fixed(amount, -1.0)
    }

    fn shift_fixed(&self, amount: &Value, sign: f64) -> Result<Self> {
        let Value::Object(fields) = amount else {
            return Err(CompaniError::InvalidArgument(format!(
                "expected to be an object, got {}",
                json_kind(amount)
            )));
        };

        let mut millis = 0f64;
        for (name, value) in fields {
            let unit = Unit::parse_plural(name)?;
            let magnitude = value.as_f64().ok_or_else(|| {
                CompaniError::InvalidArgument(format!(
                    "expected {name} to be a number, got {}",
                    json_kind(value)
                ))
            })?;
            millis += magnitude * unit.fixed_millis() as f64;
        }

        let delta = TimeDelta::try_milliseconds((sign * millis).round() as i64)
            .ok_or_else(out_of_range)?;
        let moved = self
            .to_date()
            .checked_add_signed(delta)
            .ok_or_else(out_of_range)?;
        Ok(Self::from_datetime(&moved))
    }
}
