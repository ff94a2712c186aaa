// src/handlers/time_entries.rs

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
    models::time_entry::{ClockInPayload, ClockOutPayload, TimeEntry},
};

#[utoipa::path(
    get,
    path = "/api/time-entries",
    tag = "Time",
    responses(
        (status = 200, description = "Registros de ponto; sem view_all_time, só os próprios", body = [TimeEntry])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_entries(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let entries = app_state
        .time_service
        .list_entries(&user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(entries))
}

#[utoipa::path(
    post,
    path = "/api/time-entries/clock-in",
    tag = "Time",
    request_body = ClockInPayload,
    responses(
        (status = 201, description = "Entrada registrada", body = TimeEntry),
        (status = 409, description = "Já existe um ponto aberto ou o turno não aceita entrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn clock_in(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ClockInPayload>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale)?;

    let entry = app_state
        .time_service
        .clock_in(&user, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(
    patch,
    path = "/api/time-entries/{id}/clock-out",
    tag = "Time",
    request_body = ClockOutPayload,
    params(("id" = i64, Path, description = "ID do registro de ponto")),
    responses(
        (status = 200, description = "Saída registrada", body = TimeEntry),
        (status = 409, description = "Saída já registrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn clock_out(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<ClockOutPayload>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale)?;

    let entry = app_state
        .time_service
        .clock_out(&user, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(entry))
}

#[utoipa::path(
    patch,
    path = "/api/time-entries/{id}/verify",
    tag = "Time",
    params(("id" = i64, Path, description = "ID do registro de ponto")),
    responses(
        (status = 200, description = "Ponto verificado", body = TimeEntry),
        (status = 403, description = "Sem gestão de ponto no local"),
        (status = 409, description = "Próprio ponto, ponto aberto ou já verificado")
    ),
    security(("api_jwt" = []))
)]
pub async fn verify_entry(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = app_state
        .time_service
        .verify_entry(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(entry))
}
