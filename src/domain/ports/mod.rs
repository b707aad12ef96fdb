use crate::domain::models::guest::{Guest, GuestStats};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage port for the guest directory and the check-in state machine.
///
/// `mark_attended` and `mark_food_taken` must be atomic conditional
/// updates: the status check and the write happen as one statement, so two
/// racing scans of the same guest cannot both observe the pre-transition
/// state. They return `None` when the condition no longer holds (the race
/// was lost), and the caller re-reads and re-evaluates.
#[async_trait]
pub trait GuestRepository: Send + Sync {
    /// Inserts a new guest. A duplicate `unique_id` surfaces as
    /// `AppError::Conflict` so the create path can regenerate and retry.
    async fn insert(&self, guest: &Guest) -> Result<Guest, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Guest>, AppError>;

    /// Lookup by scan code. Callers must pass the canonical
    /// (normalized) form.
    async fn find_by_unique_id(&self, unique_id: &str) -> Result<Option<Guest>, AppError>;

    /// Newest-first page of guests, optionally filtered by a search term
    /// matched case-insensitively against name, phone number and scan code.
    async fn list(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Guest>, AppError>;

    /// Number of guests matching the same filter as `list`.
    async fn count_matching(&self, search: Option<&str>) -> Result<i64, AppError>;

    /// Aggregate counters, recomputed from the table on every call.
    async fn stats(&self) -> Result<GuestStats, AppError>;

    /// Full-row administrative write. Bypasses state-machine rules.
    async fn update(&self, guest: &Guest) -> Result<Guest, AppError>;

    /// NOT_ATTENDED -> ATTENDED with `check_in_time = at`, only if the
    /// guest is not already attended.
    async fn mark_attended(&self, id: &str, at: DateTime<Utc>)
        -> Result<Option<Guest>, AppError>;

    /// NOT_TAKEN -> TAKEN with `food_time = at`, only if food was not
    /// already issued.
    async fn mark_food_taken(&self, id: &str, at: DateTime<Utc>)
        -> Result<Option<Guest>, AppError>;

    async fn delete(&self, id: &str) -> Result<(), AppError>;

    /// Removes every guest, returning how many rows went away.
    async fn delete_all(&self) -> Result<u64, AppError>;
}
