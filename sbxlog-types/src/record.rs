//! Attendance log record structures

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};

/// Event timestamp as reported by the terminal
///
/// The driver hands the calendar fields back as six separate integers.
/// They are kept raw here; [`LogTimestamp::to_datetime`] validates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogTimestamp {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
}

impl LogTimestamp {
    pub fn new(year: i32, month: i32, day: i32, hour: i32, minute: i32, second: i32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Convert to a validated [`NaiveDateTime`]
    ///
    /// # Errors
    ///
    /// Returns an error if any calendar field is out of range
    /// (e.g. month 13 or second 61 from a glitching terminal).
    pub fn to_datetime(&self) -> Result<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(self.year, self.month as u32, self.day as u32)
            .ok_or_else(|| Error::InvalidTimestamp(self.to_string()))?;

        date.and_hms_opt(self.hour as u32, self.minute as u32, self.second as u32)
            .ok_or_else(|| Error::InvalidTimestamp(self.to_string()))
    }
}

impl fmt::Display for LogTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// One attendance event from the terminal's general log
///
/// Yielded transiently by the record drain; carries exactly the fields the
/// driver reports, in whatever order the driver chose to return events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Index of the terminal that answered the poll
    pub terminal: i32,

    /// Enrolled user identifier
    pub user_id: i32,

    /// Index of the terminal where the event originated
    pub origin_terminal: i32,

    /// Vendor-defined verification method code
    pub verify_mode: i32,

    /// When the event happened
    pub timestamp: LogTimestamp,
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "user {} at {} (verify mode {})",
            self.user_id, self.timestamp, self.verify_mode
        )
    }
}
