// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::rbac::{Permission, PermissionSet, Role};

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(example = 7)]
    pub id: i64,

    #[schema(example = "joana.silva")]
    pub username: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    #[schema(example = "Joana Silva")]
    pub full_name: String,

    #[schema(example = "joana@exemplo.org")]
    pub email: String,

    pub role: Role,

    pub profile_picture: Option<String>,
    pub phone: Option<String>,

    // Locais atribuídos (relevante para cargos com escopo de local)
    #[schema(example = json!([4, 7]))]
    pub assigned_venues: Vec<i64>,

    // Permissões extras, somadas às do cargo
    #[sqlx(try_from = "Vec<String>")]
    #[schema(value_type = Vec<Permission>)]
    pub custom_permissions: PermissionSet,

    pub active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_by_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(length(min = 1, message = "O usuário é obrigatório."))]
    #[schema(example = "joana.silva")]
    pub username: String,

    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,   // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

// Criação de usuário (feita por um administrador, não há cadastro público)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(length(min = 3, max = 64, message = "O usuário deve ter entre 3 e 64 caracteres."))]
    #[schema(example = "joana.silva")]
    pub username: String,

    #[validate(length(min = 8, message = "A senha deve ter no mínimo 8 caracteres."))]
    pub password: String,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Joana Silva")]
    pub full_name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "joana@exemplo.org")]
    pub email: String,

    pub role: Role,

    pub profile_picture: Option<String>,
    pub phone: Option<String>,

    #[serde(default)]
    pub assigned_venues: Vec<i64>,

    #[serde(default)]
    #[schema(value_type = Vec<Permission>)]
    pub custom_permissions: PermissionSet,
}

// Atualização parcial. Campos ausentes ficam como estão.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub full_name: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub role: Option<Role>,

    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[schema(value_type = Option<String>)]
    pub profile_picture: Option<Option<String>>,

    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,

    pub assigned_venues: Option<Vec<i64>>,

    #[schema(value_type = Option<Vec<Permission>>)]
    pub custom_permissions: Option<PermissionSet>,

    pub active: Option<bool>,
}
