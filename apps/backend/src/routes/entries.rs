//! Time entry endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;

use crate::error::Result;
use crate::models::*;
use crate::routes::{local_now, optional_date};
use crate::AppState;

/// GET /api/entries?date=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<TimeEntry>>> {
    let date = optional_date(query.date.as_deref())?;
    let entries = state.sleep.store().list_entries(date).await?;
    Ok(Json(entries))
}

/// POST /api/entries
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<TimeEntry>)> {
    let entry_type = EntryType::parse(&payload.entry_type)?;
    let date = optional_date(payload.date.as_deref())?.unwrap_or_else(|| local_now().date());

    let entry = state.sleep.add_entry(entry_type, payload.time, date).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/entries/:id
pub async fn delete_one(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    if state.sleep.store().delete_entry(id).await? {
        tracing::info!("Deleted entry {}", id);
    } else {
        tracing::debug!("Entry {} already gone", id);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/entries?date=
pub async fn clear(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<StatusCode> {
    let date = optional_date(query.date.as_deref())?;
    let removed = state.sleep.store().delete_entries(date).await?;

    match date {
        Some(date) => tracing::info!("Cleared {} entries for {}", removed, date),
        None => tracing::info!("Cleared all {} entries", removed),
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/dates
pub async fn dates(State(state): State<AppState>) -> Result<Json<Vec<NaiveDate>>> {
    let dates = state.sleep.store().list_dates().await?;
    Ok(Json(dates))
}
