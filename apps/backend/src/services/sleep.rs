//! Sleep service: store reads wired into the sleep-core engine.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use sleep_core::{
    daily_metrics, format_duration, monthly_metrics, rolling_window, validate_new_entry,
    DailyInput, EntryIndex, SleepTarget, YearMonth,
};
use tokio::sync::Mutex;

use crate::db::SleepStore;
use crate::error::{ApiError, Result};
use crate::models::*;

/// Entry, metrics and settings operations on top of a [`SleepStore`].
pub struct SleepService {
    store: Arc<dyn SleepStore>,
    // Serializes validate-then-insert so two requests cannot both pass
    // validation against the same last entry.
    insert_lock: Mutex<()>,
}

impl SleepService {
    pub fn new(store: Arc<dyn SleepStore>) -> Self {
        Self {
            store,
            insert_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &dyn SleepStore {
        self.store.as_ref()
    }

    /// Validate a new entry against the date's last entry and store it.
    pub async fn add_entry(
        &self,
        entry_type: EntryType,
        time: String,
        date: NaiveDate,
    ) -> Result<TimeEntry> {
        let _guard = self.insert_lock.lock().await;

        let existing = self.store.list_entries(Some(date)).await?;
        if let Err(e) = validate_new_entry(existing.last(), entry_type, &time) {
            tracing::warn!(%date, %entry_type, %time, "Rejected entry: {}", e);
            return Err(e.into());
        }

        let entry = self
            .store
            .insert_entry(NewTimeEntry {
                entry_type,
                time,
                date,
            })
            .await?;

        tracing::info!(id = entry.id, %date, "Added {} entry at {}", entry.entry_type, entry.time);
        Ok(entry)
    }

    /// Resolve the required-sleep target for `date` from the stored setting.
    pub async fn resolve_target(
        &self,
        settings: Option<&SleepSettings>,
        date: NaiveDate,
    ) -> Result<Option<i32>> {
        let Some(settings) = settings else {
            return Ok(None);
        };

        let target = SleepTarget::from_setting(settings.required_sleep_minutes);
        let SleepTarget::RollingAverage { days } = target else {
            return Ok(target.resolve(&EntryIndex::new(), date)?);
        };

        // Only the window's dates need loading.
        let dates = self.store.list_dates().await?;
        let window = rolling_window(dates, date, days as usize);
        let index = match window.last() {
            Some(oldest) => {
                let entries = self.store.list_entries_between(*oldest, date).await?;
                EntryIndex::from_entries(entries)?
            }
            None => EntryIndex::new(),
        };

        Ok(target.resolve(&index, date)?)
    }

    /// Metrics for one day. `now` is local wall-clock time.
    pub async fn daily_metrics(&self, date: NaiveDate, now: NaiveDateTime) -> Result<SleepMetrics> {
        let next_date = date
            .succ_opt()
            .ok_or_else(|| ApiError::BadRequest(format!("no day follows {}", date)))?;

        let entries = self.store.list_entries(Some(date)).await?;
        let next_day = self.store.list_entries(Some(next_date)).await?;
        let settings = self.store.get_settings().await?;
        let required_sleep_minutes = self.resolve_target(settings.as_ref(), date).await?;

        let metrics = daily_metrics(DailyInput {
            date,
            entries: &entries,
            next_day: &next_day,
            required_sleep_minutes,
            settings: settings.as_ref(),
            now,
        })?;

        tracing::debug!(
            %date,
            sleep = %format_duration(metrics.total_sleep_minutes),
            awake = %format_duration(metrics.total_awake_minutes),
            night = %format_duration(metrics.night_sleep_minutes),
            "Computed daily metrics"
        );
        Ok(metrics)
    }

    /// Sparse monthly series, one point per populated date.
    pub async fn monthly_metrics(&self, month: YearMonth) -> Result<Vec<MonthlyMetricsPoint>> {
        let entries = self
            .store
            .list_entries_between(month.first_day(), month.next_first_day())
            .await?;
        let index = EntryIndex::from_entries(entries)?;
        let points = monthly_metrics(&index, month)?;

        tracing::debug!(%month, days = points.len(), "Computed monthly metrics");
        Ok(points)
    }

    /// Validate and apply a partial settings update.
    pub async fn update_settings(&self, update: SettingsUpdate) -> Result<SleepSettings> {
        update.validate()?;
        let settings = self.store.upsert_settings(&update).await?;

        tracing::info!(
            required_sleep_minutes = settings.required_sleep_minutes,
            nap = ?settings.scheduled_nap_time,
            bedtime = ?settings.scheduled_bedtime,
            "Updated sleep settings"
        );
        Ok(settings)
    }
}
