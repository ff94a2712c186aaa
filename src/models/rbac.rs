// src/models/rbac.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Cargos fixos do sistema. O conjunto não é extensível em tempo de execução.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
    ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Manager,
    Supervisor,
    Employee,
    It,
}

/// Permissões do sistema. Variantes `*_venue_*` valem apenas para os
/// locais atribuídos ao usuário; variantes `*_all_*` valem para todos.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageUsers,
    ViewAllUsers,
    ManageVenues,
    ViewAllVenues,
    ManageAllShifts,
    ManageVenueShifts,
    ViewAllShifts,
    ManageAllTime,
    ManageVenueTime,
    ViewAllTime,
    SendMassMessages,
    ManageAllTills,
    ManageVenueTills,
    ViewAllTills,
    SystemSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag(pub String);

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag desconhecida: {}", self.0)
    }
}

impl std::error::Error for UnknownTag {}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::Manager,
        Role::Supervisor,
        Role::Employee,
        Role::It,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Supervisor => "supervisor",
            Role::Employee => "employee",
            Role::It => "it",
        }
    }

    /// Hierarquia usada na gestão de usuários: ninguém altera quem está acima.
    pub fn rank(self) -> u8 {
        match self {
            Role::SuperAdmin => 5,
            Role::Admin => 4,
            Role::Manager | Role::It => 3,
            Role::Supervisor => 2,
            Role::Employee => 1,
        }
    }

    /// Permissões padrão do cargo. A tabela é fechada e total: todo cargo
    /// tem uma linha, e nenhuma linha muda em tempo de execução.
    pub fn default_permissions(self) -> &'static [Permission] {
        use Permission::*;
        match self {
            Role::SuperAdmin => &Permission::ALL,
            Role::Admin => &[
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
            Role::Manager => &[
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
            Role::Supervisor => &[
                ViewAllShifts,
                ManageVenueTime,
                ViewAllTime,
                ManageVenueTills,
                ViewAllTills,
            ],
            Role::Employee => &[],
            Role::It => &[ManageUsers, ViewAllUsers, SystemSettings],
        }
    }
}

impl FromStr for Role {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Permission {
    pub const ALL: [Permission; 15] = [
        Permission::ManageUsers,
        Permission::ViewAllUsers,
        Permission::ManageVenues,
        Permission::ViewAllVenues,
        Permission::ManageAllShifts,
        Permission::ManageVenueShifts,
        Permission::ViewAllShifts,
        Permission::ManageAllTime,
        Permission::ManageVenueTime,
        Permission::ViewAllTime,
        Permission::SendMassMessages,
        Permission::ManageAllTills,
        Permission::ManageVenueTills,
        Permission::ViewAllTills,
        Permission::SystemSettings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::ManageUsers => "manage_users",
            Permission::ViewAllUsers => "view_all_users",
            Permission::ManageVenues => "manage_venues",
            Permission::ViewAllVenues => "view_all_venues",
            Permission::ManageAllShifts => "manage_all_shifts",
            Permission::ManageVenueShifts => "manage_venue_shifts",
            Permission::ViewAllShifts => "view_all_shifts",
            Permission::ManageAllTime => "manage_all_time",
            Permission::ManageVenueTime => "manage_venue_time",
            Permission::ViewAllTime => "view_all_time",
            Permission::SendMassMessages => "send_mass_messages",
            Permission::ManageAllTills => "manage_all_tills",
            Permission::ManageVenueTills => "manage_venue_tills",
            Permission::ViewAllTills => "view_all_tills",
            Permission::SystemSettings => "system_settings",
        }
    }

    /// Para permissões usadas em contexto de local: a permissão global que
    /// dispensa a atribuição ao local. `None` para permissões sem escopo.
    pub fn unrestricted_grant(self) -> Option<Permission> {
        match self {
            Permission::ManageVenueShifts | Permission::ViewAllShifts => {
                Some(Permission::ManageAllShifts)
            }
            Permission::ManageVenueTime | Permission::ViewAllTime => Some(Permission::ManageAllTime),
            Permission::ManageVenueTills | Permission::ViewAllTills => {
                Some(Permission::ManageAllTills)
            }
            Permission::ViewAllUsers => Some(Permission::ManageUsers),
            Permission::ViewAllVenues => Some(Permission::ManageVenues),
            _ => None,
        }
    }
}

impl FromStr for Permission {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|permission| permission.as_str() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conjunto tipado de permissões (ex: as permissões extras de um usuário).
///
/// Na fronteira JSON, tags desconhecidas são rejeitadas pelo serde. Ao ler
/// do banco (`TEXT[]`), tags desconhecidas são descartadas com um aviso:
/// o resultado nunca concede mais do que o conjunto fechado conhece.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    pub fn insert(&mut self, permission: Permission) -> bool {
        self.0.insert(permission)
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Tags para gravar na coluna `TEXT[]`.
    pub fn to_tags(&self) -> Vec<String> {
        self.iter().map(|p| p.as_str().to_string()).collect()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Permission> for PermissionSet {
    fn extend<I: IntoIterator<Item = Permission>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl From<Vec<String>> for PermissionSet {
    fn from(tags: Vec<String>) -> Self {
        tags.iter()
            .filter_map(|tag| match tag.parse::<Permission>() {
                Ok(permission) => Some(permission),
                Err(e) => {
                    tracing::warn!(tag = %tag, "Ignorando permissão desconhecida gravada no banco: {}", e);
                    None
                }
            })
            .collect()
    }
}

/// Alcance de uma listagem (caixas, turnos, pontos).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    All,
    /// Registros do próprio usuário mais os dos locais listados.
    Limited { user_id: i64, venue_ids: Vec<i64> },
}

impl ListScope {
    pub fn allows(&self, employee_id: Option<i64>, venue_id: i64) -> bool {
        match self {
            ListScope::All => true,
            ListScope::Limited { user_id, venue_ids } => {
                employee_id == Some(*user_id) || venue_ids.contains(&venue_id)
            }
        }
    }

    /// Parâmetros para `$all OR employee_id = $user OR venue_id = ANY($venues)`.
    pub fn query_params(&self) -> (bool, Option<i64>, &[i64]) {
        match self {
            ListScope::All => (true, None, &[]),
            ListScope::Limited { user_id, venue_ids } => (false, Some(*user_id), venue_ids.as_slice()),
        }
    }
}

/// Linha da tabela de cargos, exposta no catálogo de permissões.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RolePermissions {
    pub role: Role,
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionCatalogue {
    pub permissions: Vec<Permission>,
    pub roles: Vec<RolePermissions>,
}
