//! PostgreSQL store

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::db::SleepStore;
use crate::error::{ApiError, Result};
use crate::models::*;

/// Store backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    fn to_core_entries(rows: Vec<DbTimeEntry>) -> Result<Vec<TimeEntry>> {
        rows.iter().map(DbTimeEntry::to_core_entry).collect()
    }
}

#[async_trait]
impl SleepStore for PgStore {
    async fn list_entries(&self, date: Option<NaiveDate>) -> Result<Vec<TimeEntry>> {
        // HH:MM is zero-padded, so text order is chronological.
        let rows = match date {
            Some(date) => {
                sqlx::query_as::<_, DbTimeEntry>(
                    r#"
                    SELECT id, entry_type, time, date, created_at
                    FROM time_entries
                    WHERE date = $1
                    ORDER BY time ASC, id ASC
                    "#,
                )
                .bind(date)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, DbTimeEntry>(
                    r#"
                    SELECT id, entry_type, time, date, created_at
                    FROM time_entries
                    ORDER BY date DESC, time ASC, id ASC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Self::to_core_entries(rows)
    }

    async fn list_entries_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<TimeEntry>> {
        let rows = sqlx::query_as::<_, DbTimeEntry>(
            r#"
            SELECT id, entry_type, time, date, created_at
            FROM time_entries
            WHERE date >= $1 AND date <= $2
            ORDER BY date ASC, time ASC, id ASC
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Self::to_core_entries(rows)
    }

    async fn insert_entry(&self, entry: NewTimeEntry) -> Result<TimeEntry> {
        let row = sqlx::query_as::<_, DbTimeEntry>(
            r#"
            INSERT INTO time_entries (entry_type, time, date)
            VALUES ($1, $2, $3)
            RETURNING id, entry_type, time, date, created_at
            "#,
        )
        .bind(entry.entry_type.as_str())
        .bind(&entry.time)
        .bind(entry.date)
        .fetch_one(&self.pool)
        .await?;

        row.to_core_entry()
    }

    async fn delete_entry(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM time_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_entries(&self, date: Option<NaiveDate>) -> Result<u64> {
        let result = match date {
            Some(date) => {
                sqlx::query("DELETE FROM time_entries WHERE date = $1")
                    .bind(date)
                    .execute(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("DELETE FROM time_entries")
                    .execute(&self.pool)
                    .await?
            }
        };

        Ok(result.rows_affected())
    }

    async fn list_dates(&self) -> Result<Vec<NaiveDate>> {
        let dates = sqlx::query_scalar::<_, NaiveDate>(
            r#"
            SELECT DISTINCT date
            FROM time_entries
            ORDER BY date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(dates)
    }

    async fn get_settings(&self) -> Result<Option<SleepSettings>> {
        let settings = sqlx::query_as::<_, DbSleepSettings>(
            r#"
            SELECT id, required_sleep_minutes, scheduled_nap_time, scheduled_bedtime,
                   created_at, updated_at
            FROM sleep_settings
            ORDER BY id
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings.map(Into::into))
    }

    async fn upsert_settings(&self, update: &SettingsUpdate) -> Result<SleepSettings> {
        let existing = self.get_settings().await?;
        let merged = update.apply(existing.as_ref(), Utc::now());

        // The table holds a single row pinned to id 1.
        let settings = sqlx::query_as::<_, DbSleepSettings>(
            r#"
            INSERT INTO sleep_settings (id, required_sleep_minutes, scheduled_nap_time, scheduled_bedtime)
            VALUES (1, $1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET
                required_sleep_minutes = EXCLUDED.required_sleep_minutes,
                scheduled_nap_time = EXCLUDED.scheduled_nap_time,
                scheduled_bedtime = EXCLUDED.scheduled_bedtime,
                updated_at = NOW()
            RETURNING id, required_sleep_minutes, scheduled_nap_time, scheduled_bedtime,
                      created_at, updated_at
            "#,
        )
        .bind(merged.required_sleep_minutes)
        .bind(&merged.scheduled_nap_time)
        .bind(&merged.scheduled_bedtime)
        .fetch_one(&self.pool)
        .await?;

        Ok(settings.into())
    }
}
