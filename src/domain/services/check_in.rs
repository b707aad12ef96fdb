use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::models::guest::Guest;
use crate::domain::ports::GuestRepository;
use crate::domain::services::identifier;
use crate::error::AppError;

/// Minimum wait between check-in and food issuance. Stops a guest from
/// re-scanning at the door and jumping the food queue before the physical
/// hand-off (wristband etc.) has happened.
pub const FOOD_COOLDOWN_MS: i64 = 120_000;

/// Structured result of one scan submission. Lookup misses and cooldown
/// blocks are ordinary values here, not errors: the calling UI branches on
/// them to drive feedback.
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    CheckedIn(Guest),
    FoodIssued(Guest),
    FoodBlocked {
        guest: Guest,
        elapsed_mins: i64,
        elapsed_secs: i64,
    },
    AlreadyProcessed(Guest),
    NotFound,
}

/// The single authoritative transition function applied on every scan,
/// whether it came from a hardware scanner or manual entry.
///
/// Rules, first match wins:
/// 1. unknown code -> NotFound
/// 2. not yet attended -> check in now
/// 3. attended, no food, cooldown still running -> blocked, no mutation
/// 4. attended, no food, cooldown elapsed -> issue food
/// 5. both done -> already processed
///
/// Both mutating rules go through conditional updates; losing the race
/// means another station advanced this guest first, so we re-read and
/// re-evaluate. Statuses only move forward, which bounds the loop.
pub async fn submit_scan(
    repo: &dyn GuestRepository,
    raw_id: &str,
    now: DateTime<Utc>,
) -> Result<ScanOutcome, AppError> {
    let unique_id = identifier::normalize(raw_id);

    let Some(mut guest) = repo.find_by_unique_id(&unique_id).await? else {
        warn!("Scan for unknown ID: {}", unique_id);
        return Ok(ScanOutcome::NotFound);
    };

    loop {
        if !guest.is_attended() {
            match repo.mark_attended(&guest.id, now).await? {
                Some(updated) => {
                    info!("Check-in success for: {}", updated.name);
                    return Ok(ScanOutcome::CheckedIn(updated));
                }
                None => {
                    guest = match repo.find_by_unique_id(&unique_id).await? {
                        Some(current) => current,
                        None => return Ok(ScanOutcome::NotFound),
                    };
                    continue;
                }
            }
        }

        if !guest.has_taken_food() {
            // An ATTENDED row without a check-in time can only come from an
            // administrative override; treat it as checked in at epoch so
            // food is issuable right away.
            let checked_in_ms = guest
                .check_in_time
                .map(|t| t.timestamp_millis())
                .unwrap_or(0);
            let elapsed_ms = now.timestamp_millis() - checked_in_ms;

            if elapsed_ms < FOOD_COOLDOWN_MS {
                return Ok(ScanOutcome::FoodBlocked {
                    guest,
                    elapsed_mins: elapsed_ms / 60_000,
                    elapsed_secs: (elapsed_ms % 60_000) / 1_000,
                });
            }

            match repo.mark_food_taken(&guest.id, now).await? {
                Some(updated) => {
                    info!("Food issue success for: {}", updated.name);
                    return Ok(ScanOutcome::FoodIssued(updated));
                }
                None => {
                    guest = match repo.find_by_unique_id(&unique_id).await? {
                        Some(current) => current,
                        None => return Ok(ScanOutcome::NotFound),
                    };
                    continue;
                }
            }
        }

        return Ok(ScanOutcome::AlreadyProcessed(guest));
    }
}
