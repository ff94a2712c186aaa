use sqlx::PgPool;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::auth::{CreateUserPayload, User},
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn list_all(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY full_name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn create_user(
        &self,
        payload: &CreateUserPayload,
        password_hash: &str,
        created_by_id: Option<i64>,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                username, password_hash, full_name, email, role,
                profile_picture, phone, assigned_venues, custom_permissions, created_by_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&payload.username)
        .bind(password_hash)
        .bind(&payload.full_name)
        .bind(&payload.email)
        .bind(payload.role)
        .bind(&payload.profile_picture)
        .bind(&payload.phone)
        .bind(&payload.assigned_venues[..])
        .bind(payload.custom_permissions.to_tags())
        .bind(created_by_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                AppError::Conflict(format!("o usuário '{}' já existe", payload.username)),
            )
        })
    }

    // Grava o estado completo (o serviço já aplicou o patch)
    pub async fn update_user(&self, user: &User) -> Result<User, AppError> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                full_name = $2,
                email = $3,
                role = $4,
                profile_picture = $5,
                phone = $6,
                assigned_venues = $7,
                custom_permissions = $8,
                active = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(user.role)
        .bind(&user.profile_picture)
        .bind(&user.phone)
        .bind(&user.assigned_venues[..])
        .bind(user.custom_permissions.to_tags())
        .bind(user.active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("usuário {}", user.id)))?;
        Ok(updated)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn touch_last_login(&self, id: i64) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET last_login = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}
