// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::rbac::Permission,
    services::rbac_service::require_permission,
};

/// Permissão exigida por uma rota, no nível do tipo.
pub trait PermissionDef: Send + Sync + 'static {
    const PERMISSION: Permission;
}

/// Guardião de rota: rejeita com 401 sem usuário e 403 sem a permissão.
/// Regras com escopo de local ficam nos serviços, que conhecem o recurso.
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_headers(&parts.headers);

        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or(AppError::InvalidToken)
            .map_err(|e| e.to_api_error(&locale))?;

        require_permission(&user.0, T::PERMISSION).map_err(|e| e.to_api_error(&locale))?;

        Ok(RequirePermission(PhantomData))
    }
}

pub struct PermManageUsers;
impl PermissionDef for PermManageUsers {
    const PERMISSION: Permission = Permission::ManageUsers;
}

pub struct PermViewAllUsers;
impl PermissionDef for PermViewAllUsers {
    const PERMISSION: Permission = Permission::ViewAllUsers;
}

pub struct PermManageVenues;
impl PermissionDef for PermManageVenues {
    const PERMISSION: Permission = Permission::ManageVenues;
}
