// src/config.rs

use anyhow::{anyhow, Context};
use axum::http::HeaderValue;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, sync::Arc, time::Duration};

use crate::{
    db::{
        MessageRepository, ShiftRepository, TillRepository, TimeEntryRepository, UserRepository,
        VenueRepository,
    },
    services::{
        AuthService, MessageService, ShiftService, TillService, TimeService, UserService,
        VenueService,
    },
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_TOKEN_TTL_HOURS: i64 = 168;

#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub token_ttl: chrono::Duration,
    pub cors_allowed_origin: Option<HeaderValue>,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de qualquer fonte chave -> valor.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        if jwt_secret.trim().is_empty() {
            return Err(anyhow!("JWT_SECRET não pode ser vazio"));
        }

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS inválido: {}", raw))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let ttl_hours = match lookup("TOKEN_TTL_HOURS") {
            Some(raw) => raw
                .parse::<i64>()
                .with_context(|| format!("TOKEN_TTL_HOURS inválido: {}", raw))?,
            None => DEFAULT_TOKEN_TTL_HOURS,
        };
        if ttl_hours <= 0 {
            return Err(anyhow!("TOKEN_TTL_HOURS deve ser positivo"));
        }

        let cors_allowed_origin = lookup("CORS_ALLOWED_ORIGIN")
            .map(|origin| {
                HeaderValue::from_str(&origin)
                    .with_context(|| format!("CORS_ALLOWED_ORIGIN inválido: {}", origin))
            })
            .transpose()?;

        let bootstrap_admin = match (
            lookup("BOOTSTRAP_ADMIN_USERNAME"),
            lookup("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(BootstrapAdmin { username, password }),
            (None, None) => None,
            _ => {
                return Err(anyhow!(
                    "BOOTSTRAP_ADMIN_USERNAME e BOOTSTRAP_ADMIN_PASSWORD devem vir juntos"
                ))
            }
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            max_connections,
            token_ttl: chrono::Duration::hours(ttl_hours),
            cors_allowed_origin,
            bootstrap_admin,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub venue_service: VenueService,
    pub shift_service: ShiftService,
    pub time_service: TimeService,
    pub message_service: MessageService,
    pub till_service: TillService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("Conexão com o banco de dados estabelecida");

        Ok(Self::from_pool(db_pool, config))
    }

    // Monta o grafo de dependências sobre um pool já criado
    pub fn from_pool(db_pool: PgPool, config: Config) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let venue_repo = VenueRepository::new(db_pool.clone());
        let shift_repo = ShiftRepository::new(db_pool.clone());
        let time_repo = TimeEntryRepository::new(db_pool.clone());
        let message_repo = MessageRepository::new(db_pool.clone());
        let till_repo = TillRepository::new(db_pool.clone());

        let auth_service =
            AuthService::new(user_repo.clone(), config.jwt_secret.clone(), config.token_ttl);
        let user_service = UserService::new(user_repo.clone());
        let venue_service = VenueService::new(venue_repo.clone());
        let shift_service = ShiftService::new(shift_repo.clone(), venue_repo, user_repo.clone());
        let time_service = TimeService::new(time_repo, shift_repo);
        let message_service = MessageService::new(message_repo, user_repo);
        let till_service = TillService::new(Arc::new(till_repo));

        Self {
            db_pool,
            config: Arc::new(config),
            auth_service,
            user_service,
            venue_service,
            shift_service,
            time_service,
            message_service,
            till_service,
        }
    }
}
