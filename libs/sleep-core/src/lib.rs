//! Sleep metrics engine shared by the sleep tracker applications.
//!
//! Provides:
//! - `HH:MM` and calendar conversion helpers
//! - Alternation and ordering checks for new entries
//! - A per-date ordered entry index
//! - Daily sleep/awake/night-sleep metrics and schedule countdowns
//! - Monthly series aggregation
//! - Required-sleep target resolution (fixed or rolling average)

pub mod error;
pub mod index;
pub mod metrics;
pub mod monthly;
pub mod target;
pub mod time;
pub mod types;
pub mod validation;

pub use error::{Error, FormatError, Result, SettingsError, ValidationError};
pub use index::EntryIndex;
pub use metrics::{daily_metrics, day_durations, night_sleep, period_totals, DailyInput, PeriodTotals};
pub use monthly::monthly_metrics;
pub use target::{rolling_average, rolling_window, SleepTarget};
pub use time::{format_duration, minutes_to_time, parse_date, time_to_minutes, YearMonth};
pub use types::{
    DayDurations, EntryType, MonthlyMetricsPoint, NewTimeEntry, NextScheduledSleep,
    ScheduledSleepKind, SettingsUpdate, SleepMetrics, SleepSettings, TimeEntry,
    DEFAULT_REQUIRED_SLEEP_MINUTES,
};
pub use validation::validate_new_entry;
