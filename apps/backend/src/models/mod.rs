//! Database models and API types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Re-export shared types from sleep-core
pub use sleep_core::types::{
    EntryType, MonthlyMetricsPoint, NewTimeEntry, SettingsUpdate, SleepMetrics, SleepSettings,
    TimeEntry,
};

use crate::error::{ApiError, Result};

// === Database Entity Types ===

/// Time entry stored in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbTimeEntry {
    pub id: i64,
    pub entry_type: String,
    pub time: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl DbTimeEntry {
    /// Convert to the core entry type
    pub fn to_core_entry(&self) -> Result<TimeEntry> {
        let entry_type = EntryType::parse(&self.entry_type).map_err(|e| {
            ApiError::Internal(format!("corrupt time entry {}: {}", self.id, e))
        })?;

        Ok(TimeEntry {
            id: self.id,
            entry_type,
            time: self.time.clone(),
            date: self.date,
            created_at: self.created_at,
        })
    }
}

/// Sleep settings row in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbSleepSettings {
    pub id: i32,
    pub required_sleep_minutes: i32,
    pub scheduled_nap_time: Option<String>,
    pub scheduled_bedtime: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbSleepSettings> for SleepSettings {
    fn from(row: DbSleepSettings) -> Self {
        Self {
            id: row.id,
            required_sleep_minutes: row.required_sleep_minutes,
            scheduled_nap_time: row.scheduled_nap_time,
            scheduled_bedtime: row.scheduled_bedtime,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// === API Request/Response Types ===

/// POST /api/entries body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntryRequest {
    /// `woke-up` or `fell-asleep`
    #[serde(rename = "type")]
    pub entry_type: String,
    pub time: String,
    /// Defaults to today
    #[serde(default)]
    pub date: Option<String>,
}

/// Optional `?date=YYYY-MM-DD` filter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

/// Optional `?month=YYYY-MM` selector
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}
