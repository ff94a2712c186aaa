// src/services/rbac_service.rs

//! Resolução de permissões: cargo + permissões extras do usuário.
//!
//! Tudo aqui é função pura sobre o `User` já carregado. Nada é cacheado:
//! a tabela de cargos é estática e cada checagem recalcula o conjunto.

use crate::{
    common::error::AppError,
    models::{
        auth::User,
        rbac::{ListScope, Permission, PermissionCatalogue, PermissionSet, Role, RolePermissions},
    },
};

/// `tabela[cargo] ∪ permissões extras`.
pub fn effective_permissions(user: &User) -> PermissionSet {
    let mut permissions: PermissionSet = user.role.default_permissions().iter().copied().collect();
    permissions.extend(user.custom_permissions.iter());
    permissions
}

pub fn has_permission(user: &User, permission: Permission) -> bool {
    user.role.default_permissions().contains(&permission)
        || user.custom_permissions.contains(permission)
}

/// Variante por tag textual. Tag desconhecida = negado.
pub fn has_permission_tag(user: &User, tag: &str) -> bool {
    tag.parse::<Permission>()
        .map(|permission| has_permission(user, permission))
        .unwrap_or(false)
}

/// Checagem no contexto de um local.
///
/// Para permissões com escopo (`manage_venue_*`, `view_all_*`) o local
/// precisa estar entre os atribuídos ao usuário, a menos que ele tenha a
/// permissão irrestrita correspondente (`manage_all_*`, `manage_users`,
/// `manage_venues`).
pub fn has_scoped_permission(user: &User, permission: Permission, venue_id: i64) -> bool {
    match permission.unrestricted_grant() {
        Some(grant) => {
            has_permission(user, grant)
                || (has_permission(user, permission) && user.assigned_venues.contains(&venue_id))
        }
        None => has_permission(user, permission),
    }
}

/// Alcance de uma listagem guardada por `view`: quem tem a permissão
/// irrestrita vê tudo; quem tem só `view` vê os próprios registros e os dos
/// locais atribuídos; os demais, apenas os próprios.
pub fn list_scope(user: &User, view: Permission) -> ListScope {
    let unrestricted = match view.unrestricted_grant() {
        Some(grant) => has_permission(user, grant),
        None => has_permission(user, view),
    };
    if unrestricted {
        return ListScope::All;
    }

    let venue_ids = if has_permission(user, view) {
        user.assigned_venues.clone()
    } else {
        Vec::new()
    };
    ListScope::Limited { user_id: user.id, venue_ids }
}

/// `permission` está coberta por quem a tem ou tem sua variante irrestrita.
pub fn covers(user: &User, permission: Permission) -> bool {
    has_permission(user, permission)
        || permission
            .unrestricted_grant()
            .is_some_and(|grant| has_permission(user, grant))
}

pub fn require_permission(user: &User, permission: Permission) -> Result<(), AppError> {
    if has_permission(user, permission) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "permissão '{}' necessária",
            permission
        )))
    }
}

pub fn require_scoped_permission(
    user: &User,
    permission: Permission,
    venue_id: i64,
) -> Result<(), AppError> {
    if has_scoped_permission(user, permission, venue_id) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "permissão '{}' necessária para o local {}",
            permission, venue_id
        )))
    }
}

/// Tabela completa, para o frontend montar as telas de permissão.
pub fn permission_catalogue() -> PermissionCatalogue {
    PermissionCatalogue {
        permissions: Permission::ALL.to_vec(),
        roles: Role::ALL
            .into_iter()
            .map(|role| RolePermissions {
                role,
                permissions: role.default_permissions().to_vec(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::fixtures::{user, user_at};
    use Permission::*;

    // Tabela documentada, escrita à mão para não depender da implementação.
    fn documented(role: Role) -> Vec<Permission> {
        match role {
            Role::SuperAdmin => Permission::ALL.to_vec(),
            Role::Admin => vec![
                ManageUsers,
                ViewAllUsers,
                ManageVenues,
                ViewAllVenues,
                ManageAllShifts,
                ViewAllShifts,
                ManageAllTime,
                ViewAllTime,
                SendMassMessages,
                ManageAllTills,
                ViewAllTills,
            ],
            Role::Manager => vec![
                ViewAllUsers,
                ViewAllVenues,
                ManageVenueShifts,
                ViewAllShifts,
                ManageVenueTime,
                ViewAllTime,
                SendMassMessages,
                ManageVenueTills,
                ViewAllTills,
            ],
            Role::Supervisor => vec![
                ViewAllShifts,
                ManageVenueTime,
                ViewAllTime,
                ManageVenueTills,
                ViewAllTills,
            ],
            Role::Employee => vec![],
            Role::It => vec![ManageUsers, ViewAllUsers, SystemSettings],
        }
    }

    #[test]
    fn role_table_matches_documentation_for_every_pair() {
        for role in Role::ALL {
            let subject = user(1, role);
            let expected = documented(role);
            for permission in Permission::ALL {
                assert_eq!(
                    has_permission(&subject, permission),
                    expected.contains(&permission),
                    "{role} / {permission}"
                );
            }
        }
    }

    #[test]
    fn super_admin_holds_everything_and_employee_nothing() {
        let root = user(1, Role::SuperAdmin);
        let staff = user(2, Role::Employee);

        assert_eq!(effective_permissions(&root).len(), Permission::ALL.len());
        assert!(effective_permissions(&staff).is_empty());
    }

    #[test]
    fn custom_permissions_are_additive() {
        let mut staff = user(2, Role::Employee);
        staff.custom_permissions.insert(SendMassMessages);

        assert!(has_permission(&staff, SendMassMessages));
        assert!(!has_permission(&staff, ManageUsers));
        assert_eq!(effective_permissions(&staff).len(), 1);

        let mut manager = user(3, Role::Manager);
        manager.custom_permissions.insert(ViewAllTills);
        assert_eq!(
            effective_permissions(&manager).len(),
            Role::Manager.default_permissions().len()
        );
    }

    #[test]
    fn unknown_tags_fail_closed() {
        let root = user(1, Role::SuperAdmin);
        assert!(has_permission_tag(&root, "manage_users"));
        assert!(!has_permission_tag(&root, "manage_galaxy"));
        assert!(!has_permission_tag(&root, ""));
    }

    #[test]
    fn scoped_permission_requires_assignment() {
        let manager = user_at(5, Role::Manager, &[4]);

        assert!(has_scoped_permission(&manager, ManageVenueTills, 4));
        assert!(!has_scoped_permission(&manager, ManageVenueTills, 7));
        assert!(has_scoped_permission(&manager, ViewAllShifts, 4));
        assert!(!has_scoped_permission(&manager, ViewAllShifts, 7));
    }

    #[test]
    fn unrestricted_grants_ignore_assignment() {
        for role in [Role::SuperAdmin, Role::Admin] {
            let boss = user(1, role);
            assert!(boss.assigned_venues.is_empty());
            for venue in [1, 4, 7, 999] {
                assert!(has_scoped_permission(&boss, ManageVenueTills, venue));
                assert!(has_scoped_permission(&boss, ManageVenueShifts, venue));
                assert!(has_scoped_permission(&boss, ViewAllTime, venue));
            }
        }
    }

    #[test]
    fn employee_has_no_scoped_access_even_when_assigned() {
        let staff = user_at(9, Role::Employee, &[4]);
        assert!(!has_scoped_permission(&staff, ManageVenueTills, 4));
        assert!(!has_scoped_permission(&staff, ViewAllTills, 4));
    }

    #[test]
    fn unscoped_permissions_ignore_venue() {
        let manager = user_at(5, Role::Manager, &[4]);
        assert!(has_scoped_permission(&manager, SendMassMessages, 7));
        assert!(!has_scoped_permission(&manager, SystemSettings, 4));
    }

    #[test]
    fn require_helpers_return_forbidden() {
        let staff = user(2, Role::Employee);
        assert!(matches!(
            require_permission(&staff, ManageVenues),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            require_scoped_permission(&staff, ManageVenueShifts, 1),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn catalogue_lists_every_role() {
        let catalogue = permission_catalogue();
        assert_eq!(catalogue.roles.len(), Role::ALL.len());
        assert_eq!(catalogue.permissions.len(), 15);
    }

    #[test]
    fn list_scope_limits_view_holders_to_assigned_venues() {
        let manager = user_at(3, Role::Manager, &[4]);
        let admin = user(1, Role::Admin);
        let staff = user_at(2, Role::Employee, &[4]);

        assert_eq!(list_scope(&admin, ViewAllTills), ListScope::All);
        assert_eq!(
            list_scope(&manager, ViewAllTills),
            ListScope::Limited { user_id: 3, venue_ids: vec![4] }
        );
        // Sem view_all_*, a atribuição ao local não amplia a listagem
        assert_eq!(
            list_scope(&staff, ViewAllShifts),
            ListScope::Limited { user_id: 2, venue_ids: vec![] }
        );
    }

    #[test]
    fn unrestricted_grant_covers_venue_variant() {
        let admin = user(1, Role::Admin);
        assert!(covers(&admin, ManageVenueTills));
        assert!(!covers(&admin, SystemSettings));
        assert!(!covers(&user(2, Role::It), ManageAllTills));
    }
}
