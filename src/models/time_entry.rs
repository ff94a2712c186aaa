// src/models/time_entry.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

// Registro de ponto. Criado na entrada (clock_out nulo enquanto ativo),
// alterado uma única vez na saída.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: i64,
    pub employee_id: i64,
    pub shift_id: i64,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    pub verified: bool,
    pub notes: Option<String>,
    pub clock_in_latitude: Option<f64>,
    pub clock_in_longitude: Option<f64>,
    pub clock_out_latitude: Option<f64>,
    pub clock_out_longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl TimeEntry {
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClockInPayload {
    pub shift_id: i64,
    pub notes: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude fora do intervalo."))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude fora do intervalo."))]
    pub longitude: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClockOutPayload {
    pub notes: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude fora do intervalo."))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude fora do intervalo."))]
    pub longitude: Option<f64>,
}
