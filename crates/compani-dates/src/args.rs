//! Loosely-typed entry points for callers that hold JSON values (request
//! bodies, query strings decoded to JSON).
//!
//! These mirror the typed constructors but reject wrong shapes explicitly:
//! `null`, empty strings, numbers where strings are expected, and surplus
//! positional arguments.

use serde_json::Value;

use crate::date::{CompaniDate, DateInput};
use crate::duration::{CompaniDuration, DurationInput};
use crate::error::{CompaniError, Result};
use crate::interval::{CompaniInterval, IntervalInput};

/// JSON type name used in shape errors.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl CompaniDate {
    /// `[]` → now, `[iso]` → parsed, `[value, format]` → parsed with format.
    pub fn from_args(args: &[Value]) -> Result<Self> {
        match args {
            [] => Ok(Self::now()),
            [Value::String(iso)] => Self::parse_iso(iso),
            [Value::String(value), Value::String(format)] => {
                Self::parse_with_format(value, format)
            }
            _ => Err(CompaniError::wrong_date_arguments()),
        }
    }

    /// [`diff`](Self::diff) with a unit that has not been type-checked yet.
    pub fn diff_value(&self, other: impl Into<DateInput>, unit: &Value) -> Result<CompaniDuration> {
        match unit {
            Value::String(unit) => self.diff(other, unit),
            _ => Err(CompaniError::InvalidArgument(
                "expected unit to be a string".to_string(),
            )),
        }
    }

    /// [`add`](Self::add), rejecting anything but an ISO 8601 duration string.
    pub fn add_value(&self, amount: &Value) -> Result<Self> {
        self.add(iso_duration_arg(amount)?)
    }

    /// [`subtract`](Self::subtract), rejecting anything but an ISO 8601 duration string.
    pub fn subtract_value(&self, amount: &Value) -> Result<Self> {
        self.subtract(iso_duration_arg(amount)?)
    }
}

fn iso_duration_arg(amount: &Value) -> Result<&str> {
    match amount {
        Value::String(iso) => Ok(iso),
        other => Err(CompaniError::InvalidArgument(format!(
            "expected an ISO 8601 duration string, got {}",
            json_kind(other)
        ))),
    }
}

impl CompaniDuration {
    /// `[]` → zero, `[iso]` → parsed, `[{unit: n, ...}]` → from integer fields.
    pub fn from_args(args: &[Value]) -> Result<Self> {
        match args {
            [] => Ok(Self::zero()),
            [Value::String(iso)] => Self::parse_iso(iso),
            [Value::Object(fields)] => {
                let fields = fields
                    .iter()
                    .map(|(name, value)| {
                        value
                            .as_i64()
                            .map(|n| (name.clone(), n))
                            .ok_or_else(CompaniError::wrong_duration_arguments)
                    })
                    .collect::<Result<Vec<_>>>()?;
                Self::new(DurationInput::Fields(fields))
            }
            _ => Err(CompaniError::wrong_duration_arguments()),
        }
    }
}

impl CompaniInterval {
    /// `[start, end]` as ISO 8601 strings.
    pub fn from_args(args: &[Value]) -> Result<Self> {
        match args {
            [Value::String(start), Value::String(end)] => {
                Self::new(IntervalInput::Bounds(start.clone(), end.clone()))
            }
            _ => Err(CompaniError::wrong_interval_arguments()),
        }
    }
}
