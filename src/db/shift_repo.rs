// src/db/shift_repo.rs

use sqlx::PgPool;

use crate::{
    common::{db_utils::map_check_violation, error::AppError},
    models::{
        rbac::ListScope,
        shift::{CreateShiftPayload, Shift, ShiftFilter},
    },
};

#[derive(Clone)]
pub struct ShiftRepository {
    pool: PgPool,
}

impl ShiftRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_shift(&self, payload: &CreateShiftPayload) -> Result<Shift, AppError> {
        sqlx::query_as::<_, Shift>(
            r#"
            INSERT INTO shifts (venue_id, employee_id, start_time, end_time, title, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(payload.venue_id)
        .bind(payload.employee_id)
        .bind(payload.start_time)
        .bind(payload.end_time)
        .bind(&payload.title)
        .bind(payload.status)
        .bind(&payload.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_check_violation(e, AppError::invalid_state("janela de turno inválida")))
    }

    pub async fn update_shift(&self, shift: &Shift) -> Result<Shift, AppError> {
        sqlx::query_as::<_, Shift>(
            r#"
            UPDATE shifts SET
                employee_id = $2, start_time = $3, end_time = $4,
                title = $5, status = $6, notes = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(shift.id)
        .bind(shift.employee_id)
        .bind(shift.start_time)
        .bind(shift.end_time)
        .bind(&shift.title)
        .bind(shift.status)
        .bind(&shift.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_check_violation(e, AppError::invalid_state("janela de turno inválida")))?
        .ok_or_else(|| AppError::not_found(format!("turno {}", shift.id)))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Shift>, AppError> {
        let shift = sqlx::query_as::<_, Shift>("SELECT * FROM shifts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(shift)
    }

    // Filtros opcionais: parâmetro nulo = sem filtro
    pub async fn list_shifts(
        &self,
        filter: &ShiftFilter,
        scope: &ListScope,
    ) -> Result<Vec<Shift>, AppError> {
        let (all, user_id, venue_ids) = scope.query_params();
        let shifts = sqlx::query_as::<_, Shift>(
            r#"
            SELECT * FROM shifts
            WHERE ($1::BIGINT IS NULL OR venue_id = $1)
              AND ($2::BIGINT IS NULL OR employee_id = $2)
              AND ($3::TIMESTAMPTZ IS NULL OR end_time >= $3)
              AND ($4::TIMESTAMPTZ IS NULL OR start_time <= $4)
              AND ($5 OR employee_id = $6 OR venue_id = ANY($7))
            ORDER BY start_time, id
            "#,
        )
        .bind(filter.venue_id)
        .bind(filter.employee_id)
        .bind(filter.from)
        .bind(filter.to)
        .bind(all)
        .bind(user_id)
        .bind(venue_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(shifts)
    }
}
