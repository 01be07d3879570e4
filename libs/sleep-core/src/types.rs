//! Core types for the sleep tracker.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{FormatError, SettingsError};
use crate::time::time_to_minutes;

/// Required sleep target used when nothing better is known (12 hours).
pub const DEFAULT_REQUIRED_SLEEP_MINUTES: i32 = 720;

/// Kind of logged event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    #[serde(rename = "woke-up")]
    WokeUp,
    #[serde(rename = "fell-asleep")]
    FellAsleep,
}

impl EntryType {
    /// Wire and storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WokeUp => "woke-up",
            Self::FellAsleep => "fell-asleep",
        }
    }

    /// Parse the wire/storage representation.
    pub fn parse(s: &str) -> Result<Self, FormatError> {
        match s {
            "woke-up" => Ok(Self::WokeUp),
            "fell-asleep" => Ok(Self::FellAsleep),
            _ => Err(FormatError::InvalidEntryType {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single wake or sleep event for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: i64,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Clock time, `HH:MM`.
    pub time: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// An entry that has passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimeEntry {
    pub entry_type: EntryType,
    pub time: String,
    pub date: NaiveDate,
}

/// The singleton settings row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSettings {
    pub id: i32,
    /// Positive: fixed daily target. Negative `-N`: rolling average over the
    /// last `N` populated dates.
    pub required_sleep_minutes: i32,
    pub scheduled_nap_time: Option<String>,
    pub scheduled_bedtime: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial settings update.
///
/// Absent fields are left untouched. For the schedule times an explicit
/// `null` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(default)]
    pub required_sleep_minutes: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub scheduled_nap_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub scheduled_bedtime: Option<Option<String>>,
}

/// Largest rolling-average window accepted, in days.
pub const MAX_ROLLING_WINDOW_DAYS: i32 = 366;

/// Largest fixed target accepted, one full day.
pub const MAX_REQUIRED_SLEEP_MINUTES: i32 = 1440;

impl SettingsUpdate {
    /// Check value ranges and time formats.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(required) = self.required_sleep_minutes {
            if required == 0 {
                return Err(SettingsError::ZeroTarget);
            }
            if !(-MAX_ROLLING_WINDOW_DAYS..=MAX_REQUIRED_SLEEP_MINUTES).contains(&required) {
                return Err(SettingsError::TargetOutOfRange {
                    value: required,
                    min: -MAX_ROLLING_WINDOW_DAYS,
                    max: MAX_REQUIRED_SLEEP_MINUTES,
                });
            }
        }
        for time in [&self.scheduled_nap_time, &self.scheduled_bedtime]
            .into_iter()
            .flatten()
            .flatten()
        {
            time_to_minutes(time)?;
        }
        Ok(())
    }

    /// Apply this update on top of existing settings, or on top of the
    /// defaults when no row exists yet.
    pub fn apply(&self, existing: Option<&SleepSettings>, now: DateTime<Utc>) -> SleepSettings {
        let mut settings = existing.cloned().unwrap_or(SleepSettings {
            id: 1,
            required_sleep_minutes: DEFAULT_REQUIRED_SLEEP_MINUTES,
            scheduled_nap_time: None,
            scheduled_bedtime: None,
            created_at: now,
            updated_at: now,
        });

        if let Some(required) = self.required_sleep_minutes {
            settings.required_sleep_minutes = required;
        }
        if let Some(nap) = &self.scheduled_nap_time {
            settings.scheduled_nap_time = nap.clone();
        }
        if let Some(bedtime) = &self.scheduled_bedtime {
            settings.scheduled_bedtime = bedtime.clone();
        }
        settings.updated_at = now;
        settings
    }
}

// Distinguishes a missing field (outer None) from an explicit null.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Which scheduled event comes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduledSleepKind {
    Nap,
    Bedtime,
}

/// Countdown to the next scheduled nap or bedtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextScheduledSleep {
    pub minutes: u32,
    #[serde(rename = "type")]
    pub kind: ScheduledSleepKind,
}

/// Raw durations for one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayDurations {
    pub total_sleep_minutes: u32,
    pub total_awake_minutes: u32,
    pub night_sleep_minutes: u32,
}

/// Derived metrics for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepMetrics {
    pub date: NaiveDate,
    pub total_sleep_minutes: u32,
    pub total_awake_minutes: u32,
    pub night_sleep_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_sleep_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_completion_percentage: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_sleep_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excess_sleep_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_next_scheduled_sleep: Option<NextScheduledSleep>,
}

/// One point of the monthly series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyMetricsPoint {
    pub day: NaiveDate,
    pub total_sleep_minutes: u32,
    pub total_awake_minutes: u32,
    pub night_sleep_minutes: u32,
}

impl MonthlyMetricsPoint {
    pub fn new(day: NaiveDate, durations: DayDurations) -> Self {
        Self {
            day,
            total_sleep_minutes: durations.total_sleep_minutes,
            total_awake_minutes: durations.total_awake_minutes,
            night_sleep_minutes: durations.night_sleep_minutes,
        }
    }
}
