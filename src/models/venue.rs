// src/models/venue.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    #[schema(example = 4)]
    pub id: i64,

    #[schema(example = "Centro Comunitário Norte")]
    pub name: String,

    #[schema(example = "Rua das Flores, 123")]
    pub address: String,

    pub description: Option<String>,

    // Coordenadas: ambas ou nenhuma
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVenuePayload {
    #[validate(length(min = 1, message = "O nome do local é obrigatório."))]
    pub name: String,

    #[validate(length(min = 1, message = "O endereço é obrigatório."))]
    pub address: String,

    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude fora do intervalo."))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude fora do intervalo."))]
    pub longitude: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVenuePayload {
    #[validate(length(min = 1, message = "O nome do local é obrigatório."))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "O endereço é obrigatório."))]
    pub address: Option<String>,

    pub description: Option<String>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude fora do intervalo."))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude fora do intervalo."))]
    pub longitude: Option<f64>,
}
