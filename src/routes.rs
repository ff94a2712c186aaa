// src/routes.rs

use axum::{
    http::{header, Method},
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

/// Monta o router completo. Tudo fora de `/api/auth`, `/api/health` e da
/// documentação passa pelo auth_guard.
pub fn app(app_state: AppState) -> Router {
    // Rotas públicas
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // Rotas protegidas
    let protected = Router::new()
        .route("/permissions", get(handlers::rbac::list_permissions))
        // --- Users ---
        .route("/users/me", get(handlers::auth::get_me))
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::users::get_user).patch(handlers::users::update_user),
        )
        // --- Venues ---
        .route(
            "/venues",
            get(handlers::venues::list_venues).post(handlers::venues::create_venue),
        )
        .route(
            "/venues/{id}",
            get(handlers::venues::get_venue).patch(handlers::venues::update_venue),
        )
        // --- Shifts ---
        .route(
            "/shifts",
            get(handlers::shifts::list_shifts).post(handlers::shifts::create_shift),
        )
        .route(
            "/shifts/{id}",
            get(handlers::shifts::get_shift).patch(handlers::shifts::update_shift),
        )
        // --- Time ---
        .route("/time-entries", get(handlers::time_entries::list_entries))
        .route("/time-entries/clock-in", post(handlers::time_entries::clock_in))
        .route(
            "/time-entries/{id}/clock-out",
            patch(handlers::time_entries::clock_out),
        )
        .route(
            "/time-entries/{id}/verify",
            patch(handlers::time_entries::verify_entry),
        )
        // --- Messages ---
        .route(
            "/messages",
            get(handlers::messages::inbox).post(handlers::messages::send_message),
        )
        .route("/messages/{id}/read", patch(handlers::messages::mark_read))
        // --- Tills ---
        .route(
            "/till-verifications",
            get(handlers::tills::list_verifications).post(handlers::tills::create_verification),
        )
        .route(
            "/till-verifications/{id}",
            get(handlers::tills::get_verification).patch(handlers::tills::edit_verification),
        )
        .route("/till-verifications/{id}/verify", patch(handlers::tills::verify))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let api = Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/auth", auth_routes)
        .merge(protected);

    let cors = cors_layer(&app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

// Sem origem configurada, qualquer origem é aceita (ambiente de desenvolvimento)
fn cors_layer(app_state: &AppState) -> CorsLayer {
    let origin = match &app_state.config.cors_allowed_origin {
        Some(origin) => AllowOrigin::exact(origin.clone()),
        None => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT_LANGUAGE])
}
