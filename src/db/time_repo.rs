// src/db/time_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::{
        rbac::ListScope,
        time_entry::{ClockInPayload, ClockOutPayload, TimeEntry},
    },
};

#[derive(Clone)]
pub struct TimeEntryRepository {
    pool: PgPool,
}

impl TimeEntryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn clock_in(
        &self,
        employee_id: i64,
        payload: &ClockInPayload,
        at: DateTime<Utc>,
    ) -> Result<TimeEntry, AppError> {
        sqlx::query_as::<_, TimeEntry>(
            r#"
            INSERT INTO time_entries (
                employee_id, shift_id, clock_in, notes, clock_in_latitude, clock_in_longitude
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(employee_id)
        .bind(payload.shift_id)
        .bind(at)
        .bind(&payload.notes)
        .bind(payload.latitude)
        .bind(payload.longitude)
        .fetch_one(&self.pool)
        .await
        // Índice parcial: um ponto aberto por funcionário
        .map_err(|e| {
            map_unique_violation(
                e,
                AppError::invalid_state("já existe um ponto aberto para este usuário"),
            )
        })
    }

    // Condicional: só fecha se ainda estiver aberto
    pub async fn clock_out(
        &self,
        id: i64,
        payload: &ClockOutPayload,
        at: DateTime<Utc>,
    ) -> Result<Option<TimeEntry>, AppError> {
        let entry = sqlx::query_as::<_, TimeEntry>(
            r#"
            UPDATE time_entries SET
                clock_out = $2,
                notes = COALESCE($3, notes),
                clock_out_latitude = $4,
                clock_out_longitude = $5
            WHERE id = $1 AND clock_out IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(at)
        .bind(&payload.notes)
        .bind(payload.latitude)
        .bind(payload.longitude)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    pub async fn mark_verified(&self, id: i64) -> Result<Option<TimeEntry>, AppError> {
        let entry = sqlx::query_as::<_, TimeEntry>(
            r#"
            UPDATE time_entries SET verified = TRUE
            WHERE id = $1 AND verified = FALSE AND clock_out IS NOT NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<TimeEntry>, AppError> {
        let entry = sqlx::query_as::<_, TimeEntry>("SELECT * FROM time_entries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(entry)
    }

    pub async fn find_open_for_employee(&self, employee_id: i64) -> Result<Option<TimeEntry>, AppError> {
        let entry = sqlx::query_as::<_, TimeEntry>(
            "SELECT * FROM time_entries WHERE employee_id = $1 AND clock_out IS NULL",
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    pub async fn list(&self, scope: &ListScope) -> Result<Vec<TimeEntry>, AppError> {
        let (all, user_id, venue_ids) = scope.query_params();
        let entries = sqlx::query_as::<_, TimeEntry>(
            r#"
            SELECT * FROM time_entries
            WHERE $1
               OR employee_id = $2
               OR shift_id IN (SELECT id FROM shifts WHERE venue_id = ANY($3))
            ORDER BY clock_in DESC, id DESC
            "#,
        )
        .bind(all)
        .bind(user_id)
        .bind(venue_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
