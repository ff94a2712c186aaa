// src/handlers/rbac.rs

use axum::Json;

use crate::{
    middleware::auth::AuthenticatedUser,
    models::rbac::PermissionCatalogue,
    services::rbac_service::permission_catalogue,
};

// GET /api/permissions (para o frontend saber o que mostrar na tela de usuários)
#[utoipa::path(
    get,
    path = "/api/permissions",
    tag = "RBAC",
    responses(
        (status = 200, description = "Permissões e padrões de cada cargo", body = PermissionCatalogue)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_permissions(_user: AuthenticatedUser) -> Json<PermissionCatalogue> {
    Json(permission_catalogue())
}
