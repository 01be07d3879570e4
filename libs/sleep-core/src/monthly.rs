//! Monthly series of daily durations.

use crate::error::FormatError;
use crate::index::EntryIndex;
use crate::metrics::day_durations;
use crate::time::YearMonth;
use crate::types::{MonthlyMetricsPoint, TimeEntry};

/// One point per populated date in `month`, ascending.
///
/// `index` must hold the month's entries and those of the first day of the
/// following month. Each day's night sleep looks ahead to the next populated
/// date, which is not necessarily the next calendar day. Lookahead never
/// goes past the first day of the following month, and that day is never
/// emitted itself. Days without entries produce no point.
pub fn monthly_metrics(index: &EntryIndex, month: YearMonth) -> Result<Vec<MonthlyMetricsPoint>, FormatError> {
    let lookahead_limit = month.next_first_day();
    let empty: Vec<&TimeEntry> = Vec::new();
    let mut points = Vec::new();

    for (date, entries) in index.range(month.first_day(), month.last_day()) {
        let next_day = index
            .next_populated_after(date)
            .filter(|next| *next <= lookahead_limit)
            .map(|next| index.entries_for(next))
            .unwrap_or_else(|| empty.clone());

        let durations = day_durations(&entries, &next_day)?;
        points.push(MonthlyMetricsPoint::new(date, durations));
    }

    Ok(points)
}
