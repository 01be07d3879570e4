//! Clock-time and calendar helpers.
//!
//! Clock times are `HH:MM` strings (24h, zero-padded) and are converted to
//! minutes since midnight for arithmetic.

use std::fmt;

use chrono::{Datelike, Months, NaiveDate, NaiveTime, Timelike};

use crate::error::FormatError;

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parse `HH:MM` into minutes since midnight (`0..=1439`).
pub fn time_to_minutes(time: &str) -> Result<u32, FormatError> {
    let invalid = || FormatError::InvalidTime {
        value: time.to_string(),
    };

    let (hours, minutes) = time.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    Ok(hours * 60 + minutes)
}

/// Format minutes as `HH:MM`, wrapping into a single day.
///
/// Only meant for display; durations are never wrapped.
pub fn minutes_to_time(minutes: i64) -> String {
    let wrapped = minutes.rem_euclid(MINUTES_PER_DAY as i64);
    format!("{:02}:{:02}", wrapped / 60, wrapped % 60)
}

/// Minutes from `start` to `end`, assuming `end` is on the following day
/// when it is earlier than `start`.
pub fn wrapped_duration(start: u32, end: u32) -> u32 {
    if end >= start {
        end - start
    } else {
        end + MINUTES_PER_DAY - start
    }
}

/// Minutes since midnight of a `NaiveTime`, seconds dropped.
pub fn minutes_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Human readable duration, e.g. `5h 9m`.
pub fn format_duration(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(date: &str) -> Result<NaiveDate, FormatError> {
    let invalid = || FormatError::InvalidDate {
        value: date.to_string(),
    };

    // Zero-padded and unsigned.
    let shape_ok = date.len() == 10
        && date.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid())
}

fn all_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// A calendar month, `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    first_day: NaiveDate,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first_day| Self { first_day })
    }

    /// Month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            first_day: date.with_day(1).unwrap_or(date),
        }
    }

    /// Parse `YYYY-MM`.
    pub fn parse(month: &str) -> Result<Self, FormatError> {
        let invalid = || FormatError::InvalidMonth {
            value: month.to_string(),
        };

        let (year, month_num) = month.split_once('-').ok_or_else(invalid)?;
        if !all_digits(year, 4) || !all_digits(month_num, 2) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month_num: u32 = month_num.parse().map_err(|_| invalid())?;
        Self::new(year, month_num).ok_or_else(invalid)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// First day of the following month.
    pub fn next_first_day(&self) -> NaiveDate {
        self.first_day
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next_first_day().pred_opt().unwrap_or(self.first_day)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.first_day.year(), self.first_day.month())
    }
}
