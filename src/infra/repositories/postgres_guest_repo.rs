use crate::domain::{
    models::guest::{Guest, GuestStats},
    ports::GuestRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

const GUEST_COLUMNS: &str = "id, unique_id, name, phone_number, area, remarks, invited_status, attendance_status, food_status, check_in_time, food_time, created_at, updated_at";

pub struct PostgresGuestRepo {
    pool: PgPool,
}

impl PostgresGuestRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_insert_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return AppError::Conflict("Guest with this ID already exists".into());
        }
    }
    AppError::Database(e)
}

#[async_trait]
impl GuestRepository for PostgresGuestRepo {
    async fn insert(&self, guest: &Guest) -> Result<Guest, AppError> {
        sqlx::query_as::<_, Guest>(
            "INSERT INTO guests (id, unique_id, name, phone_number, area, remarks, invited_status, attendance_status, food_status, check_in_time, food_time, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING *",
        )
            .bind(&guest.id)
            .bind(&guest.unique_id)
            .bind(&guest.name)
            .bind(&guest.phone_number)
            .bind(&guest.area)
            .bind(&guest.remarks)
            .bind(&guest.invited_status)
            .bind(&guest.attendance_status)
            .bind(&guest.food_status)
            .bind(guest.check_in_time)
            .bind(guest.food_time)
            .bind(guest.created_at)
            .bind(guest.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_insert_error)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Guest>, AppError> {
        sqlx::query_as::<_, Guest>(
            &format!("SELECT {} FROM guests WHERE id = $1", GUEST_COLUMNS),
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_unique_id(&self, unique_id: &str) -> Result<Option<Guest>, AppError> {
        sqlx::query_as::<_, Guest>(
            &format!("SELECT {} FROM guests WHERE unique_id = $1", GUEST_COLUMNS),
        )
            .bind(unique_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Guest>, AppError> {
        match search {
            Some(term) => {
                let pattern = format!("%{}%", term);
                sqlx::query_as::<_, Guest>(
                    &format!(
                        "SELECT {} FROM guests \
                         WHERE name ILIKE $1 OR phone_number ILIKE $1 OR unique_id LIKE $2 \
                         ORDER BY created_at DESC LIMIT $3 OFFSET $4",
                        GUEST_COLUMNS
                    ),
                )
                    .bind(&pattern)
                    .bind(pattern.to_uppercase())
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(AppError::Database)
            }
            None => {
                sqlx::query_as::<_, Guest>(
                    &format!(
                        "SELECT {} FROM guests ORDER BY created_at DESC LIMIT $1 OFFSET $2",
                        GUEST_COLUMNS
                    ),
                )
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(AppError::Database)
            }
        }
    }

    async fn count_matching(&self, search: Option<&str>) -> Result<i64, AppError> {
        match search {
            Some(term) => {
                let pattern = format!("%{}%", term);
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM guests WHERE name ILIKE $1 OR phone_number ILIKE $1 OR unique_id LIKE $2",
                )
                    .bind(&pattern)
                    .bind(pattern.to_uppercase())
                    .fetch_one(&self.pool)
                    .await
                    .map_err(AppError::Database)
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM guests")
                    .fetch_one(&self.pool)
                    .await
                    .map_err(AppError::Database)
            }
        }
    }

    async fn stats(&self) -> Result<GuestStats, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM guests")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        let attended = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM guests WHERE attendance_status = 'ATTENDED'",
        )
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        let invited = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM guests WHERE invited_status = 'INVITED'",
        )
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        let food_taken = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM guests WHERE food_status = 'TAKEN'",
        )
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(GuestStats { total, attended, invited, food_taken })
    }

    async fn update(&self, guest: &Guest) -> Result<Guest, AppError> {
        sqlx::query_as::<_, Guest>(
            "UPDATE guests SET unique_id=$1, name=$2, phone_number=$3, area=$4, remarks=$5, invited_status=$6, attendance_status=$7, food_status=$8, check_in_time=$9, food_time=$10, updated_at=$11 \
             WHERE id=$12 RETURNING *",
        )
            .bind(&guest.unique_id)
            .bind(&guest.name)
            .bind(&guest.phone_number)
            .bind(&guest.area)
            .bind(&guest.remarks)
            .bind(&guest.invited_status)
            .bind(&guest.attendance_status)
            .bind(&guest.food_status)
            .bind(guest.check_in_time)
            .bind(guest.food_time)
            .bind(Utc::now())
            .bind(&guest.id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_insert_error)
    }

    async fn mark_attended(
        &self,
        id: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Guest>, AppError> {
        sqlx::query_as::<_, Guest>(
            "UPDATE guests SET attendance_status='ATTENDED', check_in_time=$1, updated_at=$1 \
             WHERE id=$2 AND attendance_status != 'ATTENDED' RETURNING *",
        )
            .bind(at)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn mark_food_taken(
        &self,
        id: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Guest>, AppError> {
        sqlx::query_as::<_, Guest>(
            "UPDATE guests SET food_status='TAKEN', food_time=$1, updated_at=$1 \
             WHERE id=$2 AND food_status != 'TAKEN' RETURNING *",
        )
            .bind(at)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM guests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Guest not found".into()));
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM guests")
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected())
    }
}
