//! Bounded spans between two dates, and stepping through them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::date::CompaniDate;
use crate::duration::{CompaniDuration, DurationInput};
use crate::error::{CompaniError, Result};

/// The shapes an interval can be built from.
#[derive(Debug, Clone)]
pub enum IntervalInput {
    Interval(CompaniInterval),
    /// ISO 8601 start and end instants.
    Bounds(String, String),
}

impl From<CompaniInterval> for IntervalInput {
    fn from(interval: CompaniInterval) -> Self {
        IntervalInput::Interval(interval)
    }
}

impl From<&CompaniInterval> for IntervalInput {
    fn from(interval: &CompaniInterval) -> Self {
        IntervalInput::Interval(*interval)
    }
}

impl From<(&str, &str)> for IntervalInput {
    fn from((start, end): (&str, &str)) -> Self {
        IntervalInput::Bounds(start.to_string(), end.to_string())
    }
}

impl From<(String, String)> for IntervalInput {
    fn from((start, end): (String, String)) -> Self {
        IntervalInput::Bounds(start, end)
    }
}

/// An immutable span `[start, end]` with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IntervalBounds")]
pub struct CompaniInterval {
    start: CompaniDate,
    end: CompaniDate,
}

#[derive(Deserialize)]
struct IntervalBounds {
    start: CompaniDate,
    end: CompaniDate,
}

impl TryFrom<IntervalBounds> for CompaniInterval {
    type Error = CompaniError;

    fn try_from(bounds: IntervalBounds) -> Result<Self> {
        Self::from_dates(bounds.start, bounds.end)
    }
}

impl CompaniInterval {
    /// Build an interval from another interval or a pair of ISO 8601 instants.
    ///
    /// # Errors
    /// Returns `CompaniError::InvalidInterval` when a bound does not parse or
    /// when `end` precedes `start`.
    pub fn new(input: impl Into<IntervalInput>) -> Result<Self> {
        match input.into() {
            IntervalInput::Interval(interval) => Ok(interval),
            IntervalInput::Bounds(start, end) => {
                let start = CompaniDate::parse_iso(&start)
                    .map_err(|_| CompaniError::wrong_interval_arguments())?;
                let end = CompaniDate::parse_iso(&end)
                    .map_err(|_| CompaniError::wrong_interval_arguments())?;
                Self::from_dates(start, end)
            }
        }
    }

    pub fn from_dates(start: CompaniDate, end: CompaniDate) -> Result<Self> {
        if end < start {
            return Err(CompaniError::InvalidInterval(format!(
                "end before start: the end of an interval must be after its start, \
                 but you had start={start} and end={end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> CompaniDate {
        self.start
    }

    pub fn end(&self) -> CompaniDate {
        self.end
    }

    /// Exact elapsed time from start to end.
    pub fn length(&self) -> Result<CompaniDuration> {
        self.end.diff(self.start, "second")
    }

    /// Half-open membership: `start <= date < end`.
    pub fn contains(&self, date: &CompaniDate) -> bool {
        self.start <= *date && *date < self.end
    }

    /// Start of every `step`-long fragment of `[start, end)`, in order.
    ///
    /// Fragment starts are `start + i·step` in organization wall time, so month
    /// and day steps keep their wall-clock hour across DST changes. When the span
    /// is a whole number of steps, `end` is appended as well. `exclude_end`
    /// drops the last element, whatever it is.
    ///
    /// # Errors
    /// Returns `CompaniError::ZeroStep` for a zero-length step and
    /// `CompaniError::NegativeStep` for a negative one.
    pub fn range_by(
        &self,
        step: impl Into<DurationInput>,
        exclude_end: bool,
    ) -> Result<Vec<CompaniDate>> {
        let step = CompaniDuration::new(step)?;
        let total = step.total_milliseconds();
        if total == 0 {
            return Err(CompaniError::ZeroStep);
        }
        if total < 0 {
            return Err(CompaniError::NegativeStep);
        }

        let mut dates = Vec::new();
        let mut fragment_start = self.start;
        let mut lands_on_end = self.start == self.end;
        let mut index = 1i64;

        while fragment_start < self.end {
            dates.push(fragment_start);
            let offset = step.scaled(index).ok_or_else(|| {
                CompaniError::InvalidDuration("step overflow".to_string())
            })?;
            let next = self.start.plus(&offset)?;
            if next <= fragment_start {
                return Err(CompaniError::InvalidArgument(format!(
                    "duration {step} does not move forward from {fragment_start}"
                )));
            }
            if next >= self.end {
                lands_on_end = next == self.end;
                break;
            }
            fragment_start = next;
            index += 1;
        }

        if lands_on_end {
            dates.push(self.end);
        }
        if exclude_end {
            dates.pop();
        }

        tracing::trace!(interval = %self, %step, count = dates.len(), "range_by");
        Ok(dates)
    }
}

impl fmt::Display for CompaniInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start, self.end)
    }
}
