//! Wall-clock study window on an implicit single day.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::ValidationError;

/// Start and end of the study session.
///
/// If the end is not after the start, it is read as the next day, so
/// `22:00`–`02:00` is a four-hour overnight window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        let day = NaiveDate::default();
        let start = day.and_time(start);
        let mut end = day.and_time(end);
        if end <= start {
            end += Duration::days(1);
        }
        Self { start, end }
    }

    /// Parse a window from two `HH:MM` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(parse_clock(start)?, parse_clock(end)?))
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Length of the window in minutes.
    pub fn available_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn is_overnight(&self) -> bool {
        self.end.date() != self.start.date()
    }
}

/// Parse `H:MM` or `HH:MM` into a time of day.
pub fn parse_clock(raw: &str) -> Result<NaiveTime, ValidationError> {
    let invalid = || ValidationError::InvalidTime {
        value: raw.to_string(),
    };

    let (hour, minute) = raw.trim().split_once(':').ok_or_else(invalid)?;
    let hour: u32 = hour.trim().parse().map_err(|_| invalid())?;
    let minute: u32 = minute.trim().parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// Render as `HH:MM`.
pub fn format_clock(at: NaiveDateTime) -> String {
    at.format("%H:%M").to_string()
}
