//! Persistence for time entries and sleep settings.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{NewTimeEntry, SettingsUpdate, SleepSettings, TimeEntry};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage operations the service layer needs.
#[async_trait]
pub trait SleepStore: Send + Sync {
    /// Entries for one date ascending by time, or every entry descending by
    /// date then ascending by time.
    async fn list_entries(&self, date: Option<NaiveDate>) -> Result<Vec<TimeEntry>>;

    /// Entries with `from <= date <= to`, ascending by date then time.
    async fn list_entries_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<TimeEntry>>;

    async fn insert_entry(&self, entry: NewTimeEntry) -> Result<TimeEntry>;

    /// Returns whether a row was removed. A missing id is not an error.
    async fn delete_entry(&self, id: i64) -> Result<bool>;

    /// Remove one date's entries, or all entries. Returns the count removed.
    async fn delete_entries(&self, date: Option<NaiveDate>) -> Result<u64>;

    /// Distinct populated dates, descending.
    async fn list_dates(&self) -> Result<Vec<NaiveDate>>;

    async fn get_settings(&self) -> Result<Option<SleepSettings>>;

    async fn upsert_settings(&self, update: &SettingsUpdate) -> Result<SleepSettings>;
}
