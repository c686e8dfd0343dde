use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;

/// Business-hour window evaluated in a fixed IANA timezone.
///
/// The window is half-open: a message arriving at `start_hour:00` local time
/// is inside, one arriving at `end_hour:00` is outside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusinessHours {
    timezone: Tz,
    start_hour: u32,
    end_hour: u32,
}

impl BusinessHours {
    pub fn new(timezone: Tz, start_hour: u32, end_hour: u32) -> Self {
        Self { timezone, start_hour, end_hour }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn is_open_at(&self, instant: DateTime<Utc>) -> bool {
        let local_hour = instant.with_timezone(&self.timezone).hour();
        local_hour >= self.start_hour && local_hour < self.end_hour
    }
}
