// src/models/shift.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "shift_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl ShiftStatus {
    // Turnos encerrados não aceitam mais batida de ponto
    pub fn accepts_clock_in(self) -> bool {
        matches!(self, ShiftStatus::Pending | ShiftStatus::Confirmed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    #[schema(example = 10)]
    pub id: i64,
    #[schema(example = 4)]
    pub venue_id: i64,
    pub employee_id: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[schema(example = "Abertura do caixa")]
    pub title: Option<String>,
    pub status: ShiftStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateShiftPayload {
    pub venue_id: i64,
    pub employee_id: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[validate(length(max = 200, message = "Título muito longo."))]
    pub title: Option<String>,
    #[serde(default)]
    pub status: ShiftStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShiftPayload {
    /// `null` deixa o turno sem funcionário.
    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[schema(value_type = Option<i64>)]
    pub employee_id: Option<Option<i64>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[schema(value_type = Option<String>)]
    #[validate(length(max = 200, message = "Título muito longo."))]
    pub title: Option<Option<String>>,
    pub status: Option<ShiftStatus>,
    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

// Filtros de listagem (?venueId=4&from=...)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ShiftFilter {
    pub venue_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}
