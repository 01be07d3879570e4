//! In-memory store used by tests and local runs without PostgreSQL.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sleep_core::EntryIndex;

use crate::db::SleepStore;
use crate::error::{ApiError, Result};
use crate::models::{NewTimeEntry, SettingsUpdate, SleepSettings, TimeEntry};

#[derive(Default)]
struct State {
    entries: EntryIndex,
    last_id: i64,
    settings: Option<SleepSettings>,
}

/// Store keeping everything in a mutex-guarded [`EntryIndex`].
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| ApiError::Internal("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl SleepStore for MemoryStore {
    async fn list_entries(&self, date: Option<NaiveDate>) -> Result<Vec<TimeEntry>> {
        let state = self.lock()?;
        Ok(match date {
            Some(date) => state.entries.day(date),
            None => state.entries.all_desc(),
        })
    }

    async fn list_entries_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<TimeEntry>> {
        let state = self.lock()?;
        Ok(state
            .entries
            .range(from, to)
            .flat_map(|(_, entries)| entries.into_iter().cloned())
            .collect())
    }

    async fn insert_entry(&self, entry: NewTimeEntry) -> Result<TimeEntry> {
        let mut state = self.lock()?;
        state.last_id += 1;
        let stored = TimeEntry {
            id: state.last_id,
            entry_type: entry.entry_type,
            time: entry.time,
            date: entry.date,
            created_at: Utc::now(),
        };
        state.entries.insert(stored.clone())?;
        Ok(stored)
    }

    async fn delete_entry(&self, id: i64) -> Result<bool> {
        Ok(self.lock()?.entries.remove(id))
    }

    async fn delete_entries(&self, date: Option<NaiveDate>) -> Result<u64> {
        let mut state = self.lock()?;
        let removed = match date {
            Some(date) => state.entries.clear_date(date),
            None => state.entries.clear(),
        };
        Ok(removed as u64)
    }

    async fn list_dates(&self) -> Result<Vec<NaiveDate>> {
        Ok(self.lock()?.entries.dates().rev().collect())
    }

    async fn get_settings(&self) -> Result<Option<SleepSettings>> {
        Ok(self.lock()?.settings.clone())
    }

    async fn upsert_settings(&self, update: &SettingsUpdate) -> Result<SleepSettings> {
        let mut state = self.lock()?;
        let settings = update.apply(state.settings.as_ref(), Utc::now());
        state.settings = Some(settings.clone());
        Ok(settings)
    }
}
