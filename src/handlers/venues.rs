// src/handlers/venues.rs

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
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermManageVenues, RequirePermission},
    },
    models::venue::{CreateVenuePayload, UpdateVenuePayload, Venue},
};

#[utoipa::path(
    get,
    path = "/api/venues",
    tag = "Venues",
    responses(
        (status = 200, description = "Locais visíveis ao usuário", body = [Venue])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_venues(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let venues = app_state
        .venue_service
        .list_venues(&user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(venues))
}

#[utoipa::path(
    post,
    path = "/api/venues",
    tag = "Venues",
    request_body = CreateVenuePayload,
    responses(
        (status = 201, description = "Local criado", body = Venue),
        (status = 403, description = "Sem manage_venues")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_venue(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermManageVenues>,
    Json(payload): Json<CreateVenuePayload>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale)?;

    let venue = app_state
        .venue_service
        .create_venue(&user, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(venue)))
}

#[utoipa::path(
    get,
    path = "/api/venues/{id}",
    tag = "Venues",
    params(("id" = i64, Path, description = "ID do local")),
    responses(
        (status = 200, description = "Local", body = Venue),
        (status = 404, description = "Local não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_venue(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let venue = app_state
        .venue_service
        .get_venue(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(venue))
}

#[utoipa::path(
    patch,
    path = "/api/venues/{id}",
    tag = "Venues",
    request_body = UpdateVenuePayload,
    params(("id" = i64, Path, description = "ID do local")),
    responses(
        (status = 200, description = "Local atualizado", body = Venue),
        (status = 403, description = "Sem manage_venues")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_venue(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermManageVenues>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateVenuePayload>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale)?;

    let venue = app_state
        .venue_service
        .update_venue(&user, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(venue))
}
