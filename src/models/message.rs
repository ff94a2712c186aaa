// src/models/message.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

// receiver_id nulo = comunicado para todos
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: Option<i64>,
    #[schema(example = "Reunião geral na sexta às 18h.")]
    pub content: String,
    pub is_read: bool,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn is_announcement(&self) -> bool {
        self.receiver_id.is_none()
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub receiver_id: Option<i64>,

    #[validate(length(min = 1, max = 4000, message = "A mensagem deve ter entre 1 e 4000 caracteres."))]
    pub content: String,
}
