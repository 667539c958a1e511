use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::catalog::{ProgressUpdate, TrainingListing};
use crate::error::{AppError, AppResult};
use crate::session::EmployeeSession;

#[derive(Debug, Deserialize, Validate)]
pub struct ProgressReport {
    #[validate(range(max = 100))]
    pub percent: u32,
}

/// Training items for the caller's department and shared items.
pub async fn list_training(
    State(state): State<AppState>,
    session: EmployeeSession,
) -> AppResult<Json<Vec<TrainingListing>>> {
    Ok(Json(state.catalog.list_training_for(&session).await?))
}

pub async fn record_view(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.catalog.record_view(item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn report_progress(
    State(state): State<AppState>,
    session: EmployeeSession,
    Path(item_id): Path<Uuid>,
    Json(report): Json<ProgressReport>,
) -> AppResult<Json<ProgressUpdate>> {
    report.validate()?;
    let percent = u8::try_from(report.percent)
        .map_err(|_| AppError::Validation("percent must be between 0 and 100".to_string()))?;
    let update = state
        .catalog
        .report_progress(&session, item_id, percent)
        .await?;
    Ok(Json(update))
}

pub async fn mark_complete(
    State(state): State<AppState>,
    session: EmployeeSession,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<ProgressUpdate>> {
    Ok(Json(state.catalog.mark_complete(&session, item_id).await?))
}
