// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Restaurants ---
        handlers::restaurants::create_restaurant,

        // --- Locations ---
        handlers::locations::create_location,
        handlers::locations::list_locations,
        handlers::locations::get_primary_location,
        handlers::locations::location_stats,
        handlers::locations::update_location,
        handlers::locations::set_primary_location,
        handlers::locations::delete_location,

        // --- Staff ---
        handlers::staff::assign_staff,
        handlers::staff::set_staff_primary_location,
        handlers::staff::revoke_staff,
        handlers::staff::my_assignments,

        // --- Roles ---
        handlers::roles::create_role,
        handlers::roles::list_roles,
        handlers::roles::update_role,
        handlers::roles::deactivate_role,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Restaurants ---
            models::restaurant::Restaurant,
            models::restaurant::CreateRestaurantPayload,
            models::restaurant::RestaurantCreatedResponse,

            // --- Locations ---
            models::location::Location,
            models::location::LocationStatus,
            models::location::DaySchedule,
            models::location::OperatingHours,
            models::location::LocationStats,
            models::location::CreateLocationPayload,
            models::location::UpdateLocationPayload,

            // --- Staff ---
            models::assignment::LocationAssignment,
            models::assignment::AssignStaffPayload,
            models::assignment::StaffLocationPayload,

            // --- Roles ---
            models::role::Role,
            models::role::RoleScope,
            models::role::CreateRolePayload,
            models::role::UpdateRolePayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Restaurants", description = "Criação e Gestão de Restaurantes"),
        (name = "Locations", description = "Locais do Restaurante e Local Primário"),
        (name = "Staff", description = "Vínculos de Equipe (Usuário x Local x Cargo)"),
        (name = "Roles", description = "Catálogo Global de Cargos")
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
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
