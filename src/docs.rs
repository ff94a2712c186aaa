// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::get_user,
        handlers::users::update_user,

        // --- RBAC ---
        handlers::rbac::list_permissions,

        // --- Venues ---
        handlers::venues::list_venues,
        handlers::venues::create_venue,
        handlers::venues::get_venue,
        handlers::venues::update_venue,

        // --- Shifts ---
        handlers::shifts::list_shifts,
        handlers::shifts::create_shift,
        handlers::shifts::get_shift,
        handlers::shifts::update_shift,

        // --- Time ---
        handlers::time_entries::list_entries,
        handlers::time_entries::clock_in,
        handlers::time_entries::clock_out,
        handlers::time_entries::verify_entry,

        // --- Messages ---
        handlers::messages::inbox,
        handlers::messages::send_message,
        handlers::messages::mark_read,

        // --- Tills ---
        handlers::tills::list_verifications,
        handlers::tills::create_verification,
        handlers::tills::get_verification,
        handlers::tills::edit_verification,
        handlers::tills::verify,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::CreateUserPayload,
            models::auth::UpdateUserPayload,

            // --- RBAC ---
            models::rbac::Role,
            models::rbac::Permission,
            models::rbac::RolePermissions,
            models::rbac::PermissionCatalogue,

            // --- Venues ---
            models::venue::Venue,
            models::venue::CreateVenuePayload,
            models::venue::UpdateVenuePayload,

            // --- Shifts ---
            models::shift::ShiftStatus,
            models::shift::Shift,
            models::shift::CreateShiftPayload,
            models::shift::UpdateShiftPayload,

            // --- Time ---
            models::time_entry::TimeEntry,
            models::time_entry::ClockInPayload,
            models::time_entry::ClockOutPayload,

            // --- Messages ---
            models::message::Message,
            models::message::SendMessagePayload,

            // --- Tills ---
            models::till::TillStatus,
            models::till::TillVerification,
            models::till::TillVerificationView,
            models::till::CreateTillVerificationPayload,
            models::till::UpdateTillVerificationPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Login"),
        (name = "Users", description = "Cadastro de usuários e perfil"),
        (name = "RBAC", description = "Cargos e permissões"),
        (name = "Venues", description = "Locais de trabalho"),
        (name = "Shifts", description = "Escala de turnos"),
        (name = "Time", description = "Registro de ponto"),
        (name = "Messages", description = "Mensagens e comunicados"),
        (name = "Tills", description = "Conferência de caixa")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_till_routes_with_bearer_scheme() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/api/till-verifications/{id}/verify"));
        let schemes = doc.components.map(|c| c.security_schemes).unwrap_or_default();
        assert!(schemes.contains_key("api_jwt"));
    }
}
