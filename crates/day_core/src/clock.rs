use crate::error::AppError;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Source of "now" for status stamps. Swapped for [`FixedClock`] in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(local_offset())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// Formats a stamp as two-digit 12-hour time, e.g. `08:30 AM`.
pub fn format_hour_minute(at: OffsetDateTime) -> Result<String, AppError> {
    at.format(format_description!("[hour repr:12]:[minute] [period]"))
        .map_err(|err| AppError::invalid_data(err.to_string()))
}
