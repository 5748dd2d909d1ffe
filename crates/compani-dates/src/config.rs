//! Organization-wide settings: the timezone and locale every date is
//! interpreted and displayed in.

use chrono::Locale;
use chrono_tz::Tz;

/// Timezone used for wall-clock interpretation, calendar arithmetic and display.
pub const ORGANIZATION_TIMEZONE: Tz = chrono_tz::Europe::Paris;

/// Locale used by [`CompaniDate::format`](crate::CompaniDate::format).
pub const ORGANIZATION_LOCALE: Locale = Locale::fr_FR;

/// Wire format for UTC instants (`2021-11-24T07:12:08.000Z`).
pub(crate) const UTC_ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Wire format for instants rendered with the organization offset.
pub(crate) const LOCAL_ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";
