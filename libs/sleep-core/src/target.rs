//! Required-sleep target resolution.

use chrono::NaiveDate;

use crate::error::FormatError;
use crate::index::EntryIndex;
use crate::metrics::period_totals;
use crate::types::DEFAULT_REQUIRED_SLEEP_MINUTES;

/// How the stored `requiredSleepMinutes` value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepTarget {
    /// No usable target.
    Unset,
    /// Fixed daily target in minutes.
    Fixed(u32),
    /// Average total sleep over this many most recent populated dates.
    RollingAverage { days: u32 },
}

impl SleepTarget {
    pub fn from_setting(required_sleep_minutes: i32) -> Self {
        match required_sleep_minutes {
            0 => Self::Unset,
            n if n > 0 => Self::Fixed(n as u32),
            n => Self::RollingAverage {
                days: n.unsigned_abs(),
            },
        }
    }

    /// Resolve to minutes using the data available in `index`.
    pub fn resolve(&self, index: &EntryIndex, date: NaiveDate) -> Result<Option<i32>, FormatError> {
        match *self {
            Self::Unset => Ok(None),
            Self::Fixed(minutes) => Ok(Some(minutes as i32)),
            Self::RollingAverage { days } => rolling_average(index, date, days as usize).map(Some),
        }
    }
}

/// The `window` most recent populated dates on or before `date`, newest
/// first.
pub fn rolling_window<I>(dates: I, date: NaiveDate, window: usize) -> Vec<NaiveDate>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut eligible: Vec<_> = dates.into_iter().filter(|d| *d <= date).collect();
    eligible.sort_unstable_by(|a, b| b.cmp(a));
    eligible.dedup();
    eligible.truncate(window);
    eligible
}

/// Average total sleep over the rolling window, rounded to the nearest
/// minute.
///
/// Dates in the window with fewer than two entries still use up a slot but
/// are left out of the average. Falls back to 720 when nothing qualifies.
pub fn rolling_average(index: &EntryIndex, date: NaiveDate, window: usize) -> Result<i32, FormatError> {
    let mut total: u64 = 0;
    let mut counted: u64 = 0;

    for day in rolling_window(index.dates(), date, window) {
        let entries = index.entries_for(day);
        if entries.len() < 2 {
            continue;
        }
        total += period_totals(&entries)?.sleep_minutes as u64;
        counted += 1;
    }

    if counted == 0 {
        return Ok(DEFAULT_REQUIRED_SLEEP_MINUTES);
    }
    Ok((total as f64 / counted as f64).round() as i32)
}
