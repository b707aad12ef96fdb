use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateGuestRequest, ListGuestsQuery, UpdateGuestRequest};
use crate::api::dtos::responses::{DeletedResponse, GuestListResponse};
use crate::domain::models::guest::{normalize_name, Guest};
use crate::domain::services::identifier;
use crate::error::AppError;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

/// Attempts when the scan code is generated rather than supplied. A fresh
/// code collides only if the random draw hits an existing one, so one retry
/// is nearly always enough.
const GENERATE_ATTEMPTS: usize = 5;

pub async fn create_guest(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateGuestRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }

    let CreateGuestRequest { name, phone_number, area, remarks, invited_status, unique_id } =
        payload;

    let supplied = unique_id
        .map(|raw| identifier::normalize(&raw))
        .filter(|code| !code.is_empty());

    if let Some(supplied_id) = supplied {
        let guest = Guest::new(name, phone_number, area, remarks, invited_status, Some(supplied_id));
        let created = state.guest_repo.insert(&guest).await?;
        info!("Created guest {} with supplied ID {}", created.name, created.unique_id);
        return Ok(Json(created));
    }

    // Generated code: the generator never consults storage, so retry the
    // insert on the (negligible) chance of a collision.
    let mut last_conflict = None;
    for _ in 0..GENERATE_ATTEMPTS {
        let guest = Guest::new(
            name.clone(),
            phone_number.clone(),
            area.clone(),
            remarks.clone(),
            invited_status.clone(),
            None,
        );
        match state.guest_repo.insert(&guest).await {
            Ok(created) => {
                info!("Created guest {} with generated ID {}", created.name, created.unique_id);
                return Ok(Json(created));
            }
            Err(AppError::Conflict(msg)) => {
                last_conflict = Some(msg);
                continue;
            }
            Err(e) => return Err(e),
        }
    }

    Err(AppError::Conflict(last_conflict.unwrap_or_else(|| "ID generation exhausted".into())))
}

pub async fn list_guests(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListGuestsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1) * page_size;

    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let guests = state.guest_repo.list(search, page_size, offset).await?;
    let total_matching = state.guest_repo.count_matching(search).await?;
    let stats = state.guest_repo.stats().await?;

    Ok(Json(GuestListResponse { guests, stats, page, page_size, total_matching }))
}

pub async fn get_guest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let guest = state
        .guest_repo
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Guest not found".into()))?;

    Ok(Json(guest))
}

pub async fn update_guest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateGuestRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut guest = state
        .guest_repo
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Guest not found".into()))?;

    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("name cannot be blank".into()));
        }
        guest.name = normalize_name(&name);
    }
    if let Some(phone_number) = payload.phone_number {
        guest.phone_number = Some(phone_number);
    }
    if let Some(area) = payload.area {
        guest.area = Some(area);
    }
    if let Some(remarks) = payload.remarks {
        guest.remarks = Some(remarks);
    }
    if let Some(invited_status) = payload.invited_status {
        guest.invited_status = invited_status;
    }
    if let Some(attendance_status) = payload.attendance_status {
        guest.attendance_status = attendance_status;
    }
    if let Some(food_status) = payload.food_status {
        guest.food_status = food_status;
    }
    if let Some(check_in_time) = payload.check_in_time {
        guest.check_in_time = Some(check_in_time);
    }
    if let Some(food_time) = payload.food_time {
        guest.food_time = Some(food_time);
    }
    if let Some(unique_id) = payload.unique_id {
        guest.unique_id = identifier::normalize(&unique_id);
    }

    let updated = state.guest_repo.update(&guest).await?;
    info!("Updated guest: {}", id);
    Ok(Json(updated))
}

pub async fn delete_guest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.guest_repo.delete(&id).await?;
    info!("Deleted guest: {}", id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}

pub async fn delete_all_guests(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state.guest_repo.delete_all().await?;
    info!("Deleted all guests ({} records)", deleted);
    Ok(Json(DeletedResponse { deleted }))
}
