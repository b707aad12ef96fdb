use serde::Serialize;

use crate::domain::models::guest::{Guest, GuestStats};
use crate::domain::services::check_in::ScanOutcome;

#[derive(Serialize)]
pub struct ScanResponse {
    pub outcome: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest: Option<Guest>,
}

impl From<ScanOutcome> for ScanResponse {
    fn from(outcome: ScanOutcome) -> Self {
        match outcome {
            ScanOutcome::CheckedIn(guest) => Self {
                outcome: "CHECKED_IN",
                message: "Check-in successful".to_string(),
                details: None,
                guest: Some(guest),
            },
            ScanOutcome::FoodIssued(guest) => Self {
                outcome: "FOOD_ISSUED",
                message: "Food issued successfully".to_string(),
                details: None,
                guest: Some(guest),
            },
            ScanOutcome::FoodBlocked { guest, elapsed_mins, elapsed_secs } => Self {
                outcome: "FOOD_BLOCKED_COOLDOWN",
                message: "Wait 2 Mins".to_string(),
                details: Some(format!(
                    "Checked in {}m {}s ago. Please wait 2 mins for food.",
                    elapsed_mins, elapsed_secs
                )),
                guest: Some(guest),
            },
            ScanOutcome::AlreadyProcessed(guest) => Self {
                outcome: "ALREADY_PROCESSED",
                message: "Already Processed".to_string(),
                details: Some("Guest has already checked in and taken food.".to_string()),
                guest: Some(guest),
            },
            ScanOutcome::NotFound => Self {
                outcome: "NOT_FOUND",
                message: "Guest not found".to_string(),
                details: None,
                guest: None,
            },
        }
    }
}

#[derive(Serialize)]
pub struct GuestListResponse {
    pub guests: Vec<Guest>,
    pub stats: GuestStats,
    pub page: i64,
    pub page_size: i64,
    pub total_matching: i64,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}
