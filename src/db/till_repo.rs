// src/db/till_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    common::{db_utils::map_check_violation, error::AppError},
    models::{
        rbac::ListScope,
        shift::Shift,
        till::{NewTillVerification, TillAmounts, TillVerification},
    },
    services::till_service::TillStore,
};

#[derive(Clone)]
pub struct TillRepository {
    pool: PgPool,
}

impl TillRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TillStore for TillRepository {
    async fn find_shift(&self, shift_id: i64) -> Result<Option<Shift>, AppError> {
        let shift = sqlx::query_as::<_, Shift>("SELECT * FROM shifts WHERE id = $1")
            .bind(shift_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(shift)
    }

    async fn user_exists(&self, user_id: i64) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn find_verification(&self, id: i64) -> Result<Option<TillVerification>, AppError> {
        let verification =
            sqlx::query_as::<_, TillVerification>("SELECT * FROM till_verifications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(verification)
    }

    async fn list_verifications(
        &self,
        scope: &ListScope,
    ) -> Result<Vec<TillVerification>, AppError> {
        let (all, user_id, venue_ids) = scope.query_params();
        let verifications = sqlx::query_as::<_, TillVerification>(
            r#"
            SELECT * FROM till_verifications
            WHERE $1
               OR employee_id = $2
               OR shift_id IN (SELECT id FROM shifts WHERE venue_id = ANY($3))
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(all)
        .bind(user_id)
        .bind(venue_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(verifications)
    }

    async fn insert_verification(
        &self,
        new: NewTillVerification,
    ) -> Result<TillVerification, AppError> {
        sqlx::query_as::<_, TillVerification>(
            r#"
            INSERT INTO till_verifications (
                shift_id, employee_id, expected_amount, actual_amount, discrepancy, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(new.shift_id)
        .bind(new.employee_id)
        .bind(new.expected_amount)
        .bind(new.actual_amount)
        .bind(new.discrepancy)
        .bind(&new.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_check_violation(e, AppError::invalid_state("valores de caixa inválidos")))
    }

    // O predicado "verified_by IS NULL" é o que impede a edição de atropelar
    // uma verificação concorrente.
    async fn update_unverified(
        &self,
        id: i64,
        amounts: TillAmounts,
    ) -> Result<Option<TillVerification>, AppError> {
        sqlx::query_as::<_, TillVerification>(
            r#"
            UPDATE till_verifications SET
                expected_amount = $2,
                actual_amount = $3,
                discrepancy = $4,
                notes = $5
            WHERE id = $1 AND verified_by IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(amounts.expected_amount)
        .bind(amounts.actual_amount)
        .bind(amounts.discrepancy)
        .bind(&amounts.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_check_violation(e, AppError::invalid_state("valores de caixa inválidos")))
    }

    // Compare-and-set: os dois campos mudam juntos numa única instrução, e só
    // se ninguém verificou antes.
    async fn mark_verified(
        &self,
        id: i64,
        verified_by: i64,
        verified_at: DateTime<Utc>,
    ) -> Result<Option<TillVerification>, AppError> {
        sqlx::query_as::<_, TillVerification>(
            r#"
            UPDATE till_verifications SET
                verified_by = $2,
                verified_at = $3
            WHERE id = $1 AND verified_by IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(verified_by)
        .bind(verified_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            map_check_violation(
                e,
                AppError::invalid_state("ninguém pode verificar a própria contagem de caixa"),
            )
        })
    }
}
