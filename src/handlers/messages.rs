// src/handlers/messages.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    handlers::validate_payload,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::message::{Message, SendMessagePayload},
};

#[utoipa::path(
    get,
    path = "/api/messages",
    tag = "Messages",
    responses(
        (status = 200, description = "Mensagens diretas e comunicados", body = [Message])
    ),
    security(("api_jwt" = []))
)]
pub async fn inbox(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let messages = app_state
        .message_service
        .inbox(&user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(messages))
}

#[utoipa::path(
    post,
    path = "/api/messages",
    tag = "Messages",
    request_body = SendMessagePayload,
    responses(
        (status = 201, description = "Mensagem enviada", body = Message),
        (status = 403, description = "Comunicado sem send_mass_messages")
    ),
    security(("api_jwt" = []))
)]
pub async fn send_message(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<SendMessagePayload>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale)?;

    let message = app_state
        .message_service
        .send_message(&user, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(message)))
}

#[utoipa::path(
    patch,
    path = "/api/messages/{id}/read",
    tag = "Messages",
    params(("id" = i64, Path, description = "ID da mensagem")),
    responses(
        (status = 200, description = "Mensagem marcada como lida", body = Message),
        (status = 403, description = "Não é o destinatário")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_read(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let message = app_state
        .message_service
        .mark_read(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(message))
}
