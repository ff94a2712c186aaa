// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{
    common::i18n::{translate, MessageKey},
    middleware::i18n::Locale,
};

// Erros de domínio. Forbidden / InvalidState / NotFound são os três tipos
// que o motor de autorização e de conferência de caixa devolvem.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Acesso negado: {0}")]
    Forbidden(String),

    #[error("Estado inválido: {0}")]
    InvalidState(String),

    #[error("Recurso não encontrado: {0}")]
    NotFound(String),

    #[error("Conflito: {0}")]
    Conflict(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Corpo de erro devolvido pela API, já traduzido para o idioma do cliente.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<serde_json::Value>,
}

impl AppError {
    pub fn forbidden(detail: impl Into<String>) -> Self {
        AppError::Forbidden(detail.into())
    }

    pub fn invalid_state(detail: impl Into<String>) -> Self {
        AppError::InvalidState(detail.into())
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        AppError::NotFound(detail.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::InvalidState(_) | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message_key(&self) -> MessageKey {
        match self {
            AppError::ValidationError(_) => MessageKey::Validation,
            AppError::Forbidden(_) => MessageKey::Forbidden,
            AppError::InvalidState(_) => MessageKey::InvalidState,
            AppError::NotFound(_) => MessageKey::NotFound,
            AppError::Conflict(_) => MessageKey::Conflict,
            AppError::InvalidCredentials => MessageKey::InvalidCredentials,
            AppError::InvalidToken => MessageKey::InvalidToken,
            _ => MessageKey::Internal,
        }
    }

    /// Converte o erro de domínio no corpo HTTP, no idioma pedido.
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let status = self.status_code();
        let error = translate(self.message_key(), &locale.0).to_string();

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(json!(details))
            }
            AppError::Forbidden(detail)
            | AppError::InvalidState(detail)
            | AppError::NotFound(detail)
            | AppError::Conflict(detail) => Some(json!(detail)),
            AppError::InvalidCredentials | AppError::InvalidToken => None,
            // O detalhe fica no log, nunca na resposta.
            internal => {
                tracing::error!(error = %internal, "Erro Interno do Servidor");
                None
            }
        };

        ApiError { status, error, details }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

// Usado pelo middleware, onde ainda não temos o idioma extraído.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_client_statuses() {
        assert_eq!(AppError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::invalid_state("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = AppError::InternalServerError(anyhow::anyhow!("pool exhausted"));
        let api = err.to_api_error(&Locale::default());

        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(api.details.is_none());
        assert!(!api.error.contains("pool"));
    }

    #[test]
    fn messages_follow_the_locale() {
        let err = AppError::forbidden("manage_all_tills");

        let en = err.to_api_error(&Locale("en".into()));
        let pt = err.to_api_error(&Locale("pt".into()));

        assert_ne!(en.error, pt.error);
        assert_eq!(en.details, Some(json!("manage_all_tills")));
    }
}
