//! Settings endpoints

use axum::{extract::State, Json};

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// GET /api/settings/sleep
/// Returns null until settings are first saved
pub async fn get(State(state): State<AppState>) -> Result<Json<Option<SleepSettings>>> {
    let settings = state.sleep.store().get_settings().await?;
    Ok(Json(settings))
}

/// POST /api/settings/sleep
/// Partial upsert of the singleton settings row
pub async fn update(
    State(state): State<AppState>,
    Json(request): Json<SettingsUpdate>,
) -> Result<Json<SleepSettings>> {
    let settings = state.sleep.update_settings(request).await?;
    Ok(Json(settings))
}
