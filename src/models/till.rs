// src/models/till.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

// Valores sempre em centavos (unidade mínima da moeda), nunca ponto flutuante.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TillVerification {
    #[schema(example = 123)]
    pub id: i64,
    #[schema(example = 10)]
    pub shift_id: i64,

    // Quem contou o caixa
    #[schema(example = 1)]
    pub employee_id: i64,

    #[schema(example = 50000)]
    pub expected_amount: i64,
    #[schema(example = 49850)]
    pub actual_amount: i64,

    // actual - expected: positivo = sobra, negativo = falta
    pub discrepancy: i64,

    pub notes: Option<String>,

    // Ambos nulos ou ambos preenchidos
    pub verified_by: Option<i64>,
    pub verified_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TillStatus {
    Unverified,
    Verified,
}

impl TillVerification {
    pub fn status(&self) -> TillStatus {
        match (self.verified_by, self.verified_at) {
            (Some(_), Some(_)) => TillStatus::Verified,
            _ => TillStatus::Unverified,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.status() == TillStatus::Verified
    }
}

/// Registro como exposto pela API, com o status derivado.
#[derive(Debug, Serialize, ToSchema)]
pub struct TillVerificationView {
    #[serde(flatten)]
    pub verification: TillVerification,
    pub status: TillStatus,
}

impl From<TillVerification> for TillVerificationView {
    fn from(verification: TillVerification) -> Self {
        let status = verification.status();
        Self { verification, status }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTillVerificationPayload {
    pub shift_id: i64,

    // Omitido = o próprio usuário autenticado fez a contagem
    pub employee_id: Option<i64>,

    #[schema(example = 50000)]
    pub expected_amount: i64,
    #[schema(example = 49850)]
    pub actual_amount: i64,

    #[validate(length(max = 2000, message = "Observação muito longa."))]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTillVerificationPayload {
    pub expected_amount: Option<i64>,
    pub actual_amount: Option<i64>,

    /// `null` apaga a observação.
    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[schema(value_type = Option<String>)]
    #[validate(length(max = 2000, message = "Observação muito longa."))]
    pub notes: Option<Option<String>>,
}

/// Registro pronto para inserção, com a diferença já calculada.
#[derive(Debug, Clone)]
pub struct NewTillVerification {
    pub shift_id: i64,
    pub employee_id: i64,
    pub expected_amount: i64,
    pub actual_amount: i64,
    pub discrepancy: i64,
    pub notes: Option<String>,
}

/// Novos valores de um registro ainda não conferido.
#[derive(Debug, Clone)]
pub struct TillAmounts {
    pub expected_amount: i64,
    pub actual_amount: i64,
    pub discrepancy: i64,
    pub notes: Option<String>,
}
