//! # compani-dates
//!
//! Calendar-correct dates, durations and intervals for the Compani platform.
//!
//! Three immutable value types wrap `chrono`/`chrono-tz` with strict input
//! validation and explicit unit vocabularies. Every date is interpreted in the
//! organization timezone (Europe/Paris), so calendar arithmetic follows real
//! month lengths, leap years and DST transitions.
//!
//! ```rust
//! use compani_dates::{CompaniDate, CompaniDuration, CompaniInterval, DurationFormat};
//!
//! let start = CompaniDate::new("2021-03-27T10:00:00.000+01:00").unwrap();
//! let end = CompaniDate::new("2021-03-28T10:00:00.000+02:00").unwrap();
//! assert_eq!(end.diff(start, "hours").unwrap().to_iso(), "PT23H");
//! assert_eq!(end.diff(start, "days").unwrap().to_iso(), "P1D");
//!
//! let meeting = CompaniDuration::new("PT5H3M").unwrap();
//! assert_eq!(meeting.format(DurationFormat::Short), "5h03");
//!
//! let days = CompaniInterval::new(("2022-02-11T09:00:00.000Z", "2022-02-13T09:00:00.000Z"))
//!     .unwrap()
//!     .range_by("P1D", false)
//!     .unwrap();
//! assert_eq!(days.len(), 3);
//! ```
//!
//! ## Modules
//!
//! - [`date`]: `CompaniDate`: points in time, queries, `diff`, calendar arithmetic
//! - [`duration`]: `CompaniDuration`: ISO 8601 durations, formatting, comparison
//! - [`interval`]: `CompaniInterval`: bounded spans and `range_by`
//! - [`unit`]: the unit vocabulary and its spelling rules
//! - [`clock`]: overridable "current time" provider
//! - [`config`]: organization timezone and locale
//! - [`args`]: JSON-valued entry points with shape validation
//! - [`error`]: Error types

pub mod args;
pub mod clock;
pub mod config;
pub mod date;
pub mod duration;
pub mod error;
pub mod interval;
mod iso;
mod legacy;
pub mod unit;
mod zone;

pub use date::{CompaniDate, DateInput};
pub use duration::{CompaniDuration, DurationFormat, DurationInput, HoursAndMinutes};
pub use error::CompaniError;
pub use interval::{CompaniInterval, IntervalInput};
pub use unit::Unit;
