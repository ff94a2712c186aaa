// src/handlers/tills.rs

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
    models::till::{
        CreateTillVerificationPayload, TillVerificationView, UpdateTillVerificationPayload,
    },
};

#[utoipa::path(
    get,
    path = "/api/till-verifications",
    tag = "Tills",
    responses(
        (status = 200, description = "Conferências; sem view_all_tills, só as próprias", body = [TillVerificationView])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_verifications(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let verifications = app_state
        .till_service
        .list_verifications(&user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let views: Vec<TillVerificationView> = verifications.into_iter().map(Into::into).collect();
    Ok(Json(views))
}

#[utoipa::path(
    post,
    path = "/api/till-verifications",
    tag = "Tills",
    request_body = CreateTillVerificationPayload,
    responses(
        (status = 201, description = "Contagem registrada, ainda não conferida", body = TillVerificationView),
        (status = 403, description = "Registro em nome de outra pessoa sem gestão de caixa"),
        (status = 404, description = "Turno não encontrado"),
        (status = 409, description = "Valor negativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_verification(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateTillVerificationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale)?;

    let created = app_state
        .till_service
        .create_verification(&user, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(TillVerificationView::from(created))))
}

#[utoipa::path(
    get,
    path = "/api/till-verifications/{id}",
    tag = "Tills",
    params(("id" = i64, Path, description = "ID da conferência")),
    responses(
        (status = 200, description = "Conferência", body = TillVerificationView),
        (status = 403, description = "Sem acesso a esta conferência"),
        (status = 404, description = "Conferência não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_verification(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let verification = app_state
        .till_service
        .get_verification(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(TillVerificationView::from(verification)))
}

#[utoipa::path(
    patch,
    path = "/api/till-verifications/{id}",
    tag = "Tills",
    request_body = UpdateTillVerificationPayload,
    params(("id" = i64, Path, description = "ID da conferência")),
    responses(
        (status = 200, description = "Valores alterados e diferença recalculada", body = TillVerificationView),
        (status = 403, description = "Nem dono nem gestor de caixa"),
        (status = 409, description = "Já conferida ou valor negativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn edit_verification(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTillVerificationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale)?;

    let updated = app_state
        .till_service
        .edit_verification(&user, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(TillVerificationView::from(updated)))
}

#[utoipa::path(
    patch,
    path = "/api/till-verifications/{id}/verify",
    tag = "Tills",
    params(("id" = i64, Path, description = "ID da conferência")),
    responses(
        (status = 200, description = "Conferência verificada", body = TillVerificationView),
        (status = 403, description = "Sem gestão de caixa no local"),
        (status = 409, description = "Própria contagem ou já verificada")
    ),
    security(("api_jwt" = []))
)]
pub async fn verify(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let verified = app_state
        .till_service
        .verify(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(TillVerificationView::from(verified)))
}
