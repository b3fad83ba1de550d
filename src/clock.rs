//! Time source for the `lastUpdate` stamp.

use chrono::{DateTime, SecondsFormat, Utc};

/// Supplies "now" when a save records its timestamp.
///
/// Swap in a fixed clock through
/// [`SettingsStoreBuilder::clock`](crate::SettingsStoreBuilder::clock) to get
/// reproducible files in tests.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
pub fn render_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
