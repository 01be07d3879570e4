//! Metrics endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use sleep_core::YearMonth;

use crate::error::Result;
use crate::models::*;
use crate::routes::{local_now, optional_date};
use crate::AppState;

/// GET /api/metrics?date=
/// Defaults to today
pub async fn daily(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<SleepMetrics>> {
    let now = local_now();
    let date = optional_date(query.date.as_deref())?.unwrap_or(now.date());

    let metrics = state.sleep.daily_metrics(date, now).await?;
    Ok(Json(metrics))
}

/// GET /api/metrics/monthly?month=
/// Defaults to the current month
pub async fn monthly(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<MonthlyMetricsPoint>>> {
    let month = match query.month.as_deref() {
        Some(month) => YearMonth::parse(month)?,
        None => YearMonth::of(local_now().date()),
    };

    let points = state.sleep.monthly_metrics(month).await?;
    Ok(Json(points))
}
