use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CheckInRequest {
    pub unique_id: String,
}

#[derive(Deserialize)]
pub struct CreateGuestRequest {
    pub name: String,
    pub phone_number: Option<String>,
    pub area: Option<String>,
    pub remarks: Option<String>,
    pub invited_status: Option<String>,
    pub unique_id: Option<String>,
}

/// Administrative patch. Every field optional; supplied fields overwrite
/// the stored ones without going through the check-in state machine.
#[derive(Deserialize)]
pub struct UpdateGuestRequest {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub area: Option<String>,
    pub remarks: Option<String>,
    pub invited_status: Option<String>,
    pub attendance_status: Option<String>,
    pub food_status: Option<String>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub food_time: Option<DateTime<Utc>>,
    pub unique_id: Option<String>,
}

#[derive(Deserialize)]
pub struct ListGuestsQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
}
