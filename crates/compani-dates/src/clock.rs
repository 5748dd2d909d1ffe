//! Process-wide "current time" provider.
//!
//! [`CompaniDate::now`](crate::CompaniDate::now) reads the clock through
//! [`now`]. Tests can pin it with [`set_now`]/[`reset_now`] or, preferably, the
//! scoped [`freeze`] guard which restores the previous clock when dropped.
//!
//! The override is global: tests that use it must not run concurrently with
//! other time-dependent tests (serialize them, e.g. with `serial_test`).

use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::date::CompaniDate;
use crate::error::Result;

static OVERRIDE: RwLock<Option<DateTime<Utc>>> = RwLock::new(None);

/// Current instant: the override if one is set, the system clock otherwise.
pub fn now() -> DateTime<Utc> {
    match OVERRIDE.read() {
        Ok(guard) => (*guard).unwrap_or_else(Utc::now),
        Err(poisoned) => (*poisoned.into_inner()).unwrap_or_else(Utc::now),
    }
}

/// Pin the clock to the instant described by an ISO 8601 string.
pub fn set_now(iso: &str) -> Result<()> {
    let pinned = CompaniDate::parse_iso(iso)?.to_date();
    tracing::debug!(now = %pinned, "clock override set");
    replace(Some(pinned));
    Ok(())
}

/// Restore the system clock.
pub fn reset_now() {
    tracing::debug!("clock override reset");
    replace(None);
}

/// Pin the clock until the returned guard is dropped. Guards nest: dropping
/// one puts back whatever override was active when it was created.
#[must_use = "the clock is restored as soon as the guard is dropped"]
pub fn freeze(iso: &str) -> Result<ClockGuard> {
    let pinned = CompaniDate::parse_iso(iso)?.to_date();
    let previous = replace(Some(pinned));
    tracing::debug!(now = %pinned, "clock frozen");
    Ok(ClockGuard { previous })
}

/// Restores the previous clock state on drop. See [`freeze`].
#[derive(Debug)]
pub struct ClockGuard {
    previous: Option<DateTime<Utc>>,
}

impl Drop for ClockGuard {
    fn drop(&mut self) {
        tracing::debug!(restored = ?self.previous, "clock thawed");
        replace(self.previous);
    }
}

/// Swap in a new override and return the one it replaces.
fn replace(value: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    match OVERRIDE.write() {
        Ok(mut guard) => std::mem::replace(&mut *guard, value),
        Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), value),
    }
}
