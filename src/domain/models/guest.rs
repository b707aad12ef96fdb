use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::services::identifier;

pub const INVITED: &str = "INVITED";
pub const NOT_INVITED: &str = "NOT_INVITED";
pub const ATTENDED: &str = "ATTENDED";
pub const NOT_ATTENDED: &str = "NOT_ATTENDED";
pub const TAKEN: &str = "TAKEN";
pub const NOT_TAKEN: &str = "NOT_TAKEN";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Guest {
    pub id: String,
    pub unique_id: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub area: Option<String>,
    pub remarks: Option<String>,
    pub invited_status: String,    // NOT_INVITED, INVITED
    pub attendance_status: String, // NOT_ATTENDED, ATTENDED
    pub food_status: String,       // NOT_TAKEN, TAKEN
    pub check_in_time: Option<DateTime<Utc>>,
    pub food_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Guest {
    pub fn new(
        name: String,
        phone_number: Option<String>,
        area: Option<String>,
        remarks: Option<String>,
        invited_status: Option<String>,
        unique_id: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            unique_id: unique_id
                .map(|raw| identifier::normalize(&raw))
                .unwrap_or_else(identifier::generate),
            name: normalize_name(&name),
            phone_number,
            area,
            remarks,
            invited_status: invited_status.unwrap_or_else(|| NOT_INVITED.to_string()),
            attendance_status: NOT_ATTENDED.to_string(),
            food_status: NOT_TAKEN.to_string(),
            check_in_time: None,
            food_time: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_attended(&self) -> bool {
        self.attendance_status == ATTENDED
    }

    pub fn has_taken_food(&self) -> bool {
        self.food_status == TAKEN
    }
}

/// Title-cases a guest name: first letter of each word upper, rest lower.
/// Pure function, called explicitly by the create/update paths before
/// persistence.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Aggregate counters over the guest table. Always derived by counting the
/// current rows, never maintained as a separate tally.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GuestStats {
    pub total: i64,
    pub attended: i64,
    pub invited: i64,
    pub food_taken: i64,
}
