// src/services/user_service.rs

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::{
        auth::{CreateUserPayload, UpdateUserPayload, User},
        rbac::{Permission, PermissionSet, Role},
    },
    services::{
        auth::hash_password,
        rbac_service::{covers, has_permission, require_permission},
    },
};

// Só um super_admin cria ou promove outro super_admin.
pub fn ensure_can_assign_role(acting_user: &User, role: Role) -> Result<(), AppError> {
    if role == Role::SuperAdmin && acting_user.role != Role::SuperAdmin {
        return Err(AppError::forbidden(
            "apenas super_admin pode atribuir o cargo super_admin",
        ));
    }
    Ok(())
}

/// Fora do super_admin, ninguém concede o que não tem: nem por permissão
/// avulsa nem pelas permissões padrão do cargo atribuído.
pub fn ensure_can_grant(
    acting_user: &User,
    role: Option<Role>,
    permissions: Option<&PermissionSet>,
) -> Result<(), AppError> {
    if acting_user.role == Role::SuperAdmin {
        return Ok(());
    }
    let role_permissions = role.map(Role::default_permissions).unwrap_or_default();
    let granted = role_permissions
        .iter()
        .copied()
        .chain(permissions.into_iter().flat_map(|set| set.iter()));

    for permission in granted {
        if !covers(acting_user, permission) {
            return Err(AppError::forbidden(format!(
                "sem permissão para conceder {}",
                permission
            )));
        }
    }
    Ok(())
}

pub fn ensure_can_modify(acting_user: &User, target: &User) -> Result<(), AppError> {
    if acting_user.role == Role::SuperAdmin {
        return Ok(());
    }
    if target.role == Role::SuperAdmin {
        return Err(AppError::forbidden(
            "apenas super_admin pode alterar outro super_admin",
        ));
    }
    if target.role.rank() > acting_user.role.rank() {
        return Err(AppError::forbidden(format!(
            "{} não pode alterar um usuário {}",
            acting_user.role, target.role
        )));
    }
    Ok(())
}

pub fn ensure_self_edit_allowed(
    acting_user: &User,
    payload: &UpdateUserPayload,
) -> Result<(), AppError> {
    if acting_user.role != Role::SuperAdmin
        && (payload.role.is_some() || payload.custom_permissions.is_some())
    {
        return Err(AppError::forbidden(
            "ninguém altera o próprio cargo ou as próprias permissões",
        ));
    }
    if payload.active == Some(false) {
        return Err(AppError::invalid_state("ninguém pode desativar a própria conta"));
    }
    Ok(())
}

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    pub async fn create_user(
        &self,
        acting_user: &User,
        payload: CreateUserPayload,
    ) -> Result<User, AppError> {
        require_permission(acting_user, Permission::ManageUsers)?;
        ensure_can_assign_role(acting_user, payload.role)?;
        ensure_can_grant(acting_user, Some(payload.role), Some(&payload.custom_permissions))?;

        let password_hash = hash_password(&payload.password).await?;

        let user = self.repo
            .create_user(&payload, &password_hash, Some(acting_user.id))
            .await?;

        tracing::info!(
            user_id = user.id,
            role = %user.role,
            created_by = acting_user.id,
            "Usuário criado"
        );
        Ok(user)
    }

    /// Banco vazio: cria o primeiro super_admin a partir da configuração.
    /// Com qualquer usuário já cadastrado, não faz nada.
    pub async fn ensure_bootstrap_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        if self.repo.count().await? > 0 {
            return Ok(None);
        }

        let payload = CreateUserPayload {
            username: username.to_string(),
            password: password.to_string(),
            full_name: "Administrador".to_string(),
            email: format!("{}@localhost", username),
            role: Role::SuperAdmin,
            profile_picture: None,
            phone: None,
            assigned_venues: Vec::new(),
            custom_permissions: Default::default(),
        };
        let password_hash = hash_password(password).await?;
        let user = self.repo.create_user(&payload, &password_hash, None).await?;

        tracing::warn!(user_id = user.id, username = %username, "Super admin inicial criado; troque a senha");
        Ok(Some(user))
    }

    pub async fn list_users(&self, acting_user: &User) -> Result<Vec<User>, AppError> {
        require_permission(acting_user, Permission::ViewAllUsers)?;
        self.repo.list_all().await
    }

    pub async fn get_user(&self, acting_user: &User, id: i64) -> Result<User, AppError> {
        if acting_user.id != id && !has_permission(acting_user, Permission::ViewAllUsers) {
            return Err(AppError::forbidden("sem permissão para ver outros usuários"));
        }
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("usuário {}", id)))
    }

    pub async fn update_user(
        &self,
        acting_user: &User,
        id: i64,
        payload: UpdateUserPayload,
    ) -> Result<User, AppError> {
        require_permission(acting_user, Permission::ManageUsers)?;

        let mut target = self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("usuário {}", id)))?;

        ensure_can_modify(acting_user, &target)?;
        if let Some(role) = payload.role {
            ensure_can_assign_role(acting_user, role)?;
        }
        ensure_can_grant(acting_user, payload.role, payload.custom_permissions.as_ref())?;
        if acting_user.id == id {
            ensure_self_edit_allowed(acting_user, &payload)?;
        }

        apply_user_patch(&mut target, payload);

        let updated = self.repo.update_user(&target).await?;
        tracing::info!(user_id = updated.id, updated_by = acting_user.id, "Usuário atualizado");
        Ok(updated)
    }
}

fn apply_user_patch(target: &mut User, patch: UpdateUserPayload) {
    if let Some(full_name) = patch.full_name {
        target.full_name = full_name;
    }
    if let Some(email) = patch.email {
        target.email = email;
    }
    if let Some(role) = patch.role {
        target.role = role;
    }
    if let Some(profile_picture) = patch.profile_picture {
        target.profile_picture = profile_picture;
    }
    if let Some(phone) = patch.phone {
        target.phone = phone;
    }
    if let Some(venues) = patch.assigned_venues {
        target.assigned_venues = venues;
    }
    if let Some(permissions) = patch.custom_permissions {
        target.custom_permissions = permissions;
    }
    if let Some(active) = patch.active {
        target.active = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::fixtures::user;

    #[test]
    fn only_super_admin_grants_super_admin() {
        let admin = user(1, Role::Admin);
        let root = user(2, Role::SuperAdmin);

        assert!(matches!(
            ensure_can_assign_role(&admin, Role::SuperAdmin),
            Err(AppError::Forbidden(_))
        ));
        assert!(ensure_can_assign_role(&admin, Role::Manager).is_ok());
        assert!(ensure_can_assign_role(&root, Role::SuperAdmin).is_ok());
    }

    #[test]
    fn grants_are_limited_to_what_the_actor_holds() {
        let it = user(6, Role::It);
        let admin = user(1, Role::Admin);
        let root = user(2, Role::SuperAdmin);
        let tills: PermissionSet = [Permission::ManageAllTills].into_iter().collect();

        assert!(matches!(
            ensure_can_grant(&it, None, Some(&tills)),
            Err(AppError::Forbidden(_))
        ));
        // Cargo cujas permissões padrão o ator não tem
        assert!(matches!(
            ensure_can_grant(&it, Some(Role::Manager), None),
            Err(AppError::Forbidden(_))
        ));
        assert!(ensure_can_grant(&it, Some(Role::Employee), None).is_ok());

        // manage_all_tills cobre a variante por local
        let venue_tills: PermissionSet = [Permission::ManageVenueTills].into_iter().collect();
        assert!(ensure_can_grant(&admin, Some(Role::Manager), Some(&venue_tills)).is_ok());
        assert!(ensure_can_grant(&admin, Some(Role::It), None).is_err());

        let everything: PermissionSet = Permission::ALL.into_iter().collect();
        assert!(ensure_can_grant(&root, Some(Role::It), Some(&everything)).is_ok());
    }

    #[test]
    fn own_role_and_permissions_are_off_limits() {
        let it = user(6, Role::It);
        let root = user(2, Role::SuperAdmin);
        let promote = UpdateUserPayload {
            custom_permissions: Some([Permission::ManageAllTills].into_iter().collect()),
            ..Default::default()
        };

        assert!(matches!(
            ensure_self_edit_allowed(&it, &promote),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            ensure_self_edit_allowed(
                &it,
                &UpdateUserPayload { role: Some(Role::It), ..Default::default() }
            ),
            Err(AppError::Forbidden(_))
        ));
        assert!(ensure_self_edit_allowed(
            &it,
            &UpdateUserPayload { phone: Some(None), ..Default::default() }
        )
        .is_ok());
        assert!(ensure_self_edit_allowed(&root, &promote).is_ok());
        assert!(matches!(
            ensure_self_edit_allowed(
                &root,
                &UpdateUserPayload { active: Some(false), ..Default::default() }
            ),
            Err(AppError::InvalidState(_))
        ));
    }

    #[test]
    fn admin_cannot_modify_super_admin() {
        let admin = user(1, Role::Admin);
        let root = user(2, Role::SuperAdmin);
        assert!(ensure_can_modify(&admin, &root).is_err());
        assert!(ensure_can_modify(&root, &admin).is_ok());
    }

    #[test]
    fn nobody_modifies_a_higher_rank() {
        let it = user(6, Role::It);
        let admin = user(1, Role::Admin);
        let manager = user(3, Role::Manager);

        assert!(matches!(
            ensure_can_modify(&it, &admin),
            Err(AppError::Forbidden(_))
        ));
        assert!(ensure_can_modify(&admin, &it).is_ok());
        assert!(ensure_can_modify(&it, &manager).is_ok());
        assert!(ensure_can_modify(&manager, &it).is_ok());
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut target = user(3, Role::Employee);
        let permissions: PermissionSet = [Permission::SendMassMessages].into_iter().collect();

        apply_user_patch(
            &mut target,
            UpdateUserPayload {
                role: Some(Role::Supervisor),
                assigned_venues: Some(vec![4]),
                custom_permissions: Some(permissions.clone()),
                ..Default::default()
            },
        );

        assert_eq!(target.role, Role::Supervisor);
        assert_eq!(target.assigned_venues, vec![4]);
        assert_eq!(target.custom_permissions, permissions);
        assert_eq!(target.full_name, "User 3");
        assert!(target.active);
    }
}
