// src/handlers/shifts.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    handlers::validate_payload,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::shift::{CreateShiftPayload, Shift, ShiftFilter, UpdateShiftPayload},
};

#[utoipa::path(
    get,
    path = "/api/shifts",
    tag = "Shifts",
    params(ShiftFilter),
    responses(
        (status = 200, description = "Turnos filtrados; sem view_all_shifts, só os próprios", body = [Shift])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_shifts(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(filter): Query<ShiftFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let shifts = app_state
        .shift_service
        .list_shifts(&user, filter)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(shifts))
}

#[utoipa::path(
    post,
    path = "/api/shifts",
    tag = "Shifts",
    request_body = CreateShiftPayload,
    responses(
        (status = 201, description = "Turno criado", body = Shift),
        (status = 403, description = "Sem gestão de turnos no local"),
        (status = 409, description = "Janela de horário inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_shift(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateShiftPayload>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale)?;

    let shift = app_state
        .shift_service
        .create_shift(&user, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(shift)))
}

#[utoipa::path(
    get,
    path = "/api/shifts/{id}",
    tag = "Shifts",
    params(("id" = i64, Path, description = "ID do turno")),
    responses(
        (status = 200, description = "Turno", body = Shift),
        (status = 404, description = "Turno não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_shift(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let shift = app_state
        .shift_service
        .get_shift(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(shift))
}

#[utoipa::path(
    patch,
    path = "/api/shifts/{id}",
    tag = "Shifts",
    request_body = UpdateShiftPayload,
    params(("id" = i64, Path, description = "ID do turno")),
    responses(
        (status = 200, description = "Turno atualizado", body = Shift),
        (status = 403, description = "Sem gestão de turnos no local")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_shift(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateShiftPayload>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale)?;

    let shift = app_state
        .shift_service
        .update_shift(&user, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(shift))
}
