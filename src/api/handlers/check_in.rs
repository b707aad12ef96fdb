use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::CheckInRequest;
use crate::api::dtos::responses::ScanResponse;
use crate::domain::services::check_in::{self, ScanOutcome};
use crate::error::AppError;
use crate::state::AppState;

/// Single scan endpoint shared by the entry gate and the food counter.
/// The state machine works out which transition is due; the client only
/// renders the outcome.
pub async fn submit_scan(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CheckInRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.unique_id.trim().is_empty() {
        return Err(AppError::Validation("unique_id is required".into()));
    }

    info!("Scan attempt for ID: {}", payload.unique_id.trim());

    let outcome =
        check_in::submit_scan(state.guest_repo.as_ref(), &payload.unique_id, Utc::now()).await?;

    let status = match outcome {
        ScanOutcome::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::OK,
    };

    Ok((status, Json(ScanResponse::from(outcome))))
}
