// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login_form,
        handlers::auth::login,
        handlers::auth::register_form,
        handlers::auth::register,
        handlers::auth::logout,

        // --- Profile ---
        handlers::auth::get_profile,
        handlers::auth::update_profile,

        // --- Customer ---
        handlers::customer::dashboard,
        handlers::customer::rent_vehicle,
        handlers::customer::return_vehicle,
        handlers::customer::payment_history,

        // --- Staff ---
        handlers::staff::dashboard,
        handlers::staff::update_vehicle_status,

        // --- Admin ---
        handlers::admin_users::dashboard,
        handlers::admin_users::set_role,
        handlers::admin_users::add_user_form,
        handlers::admin_users::add_user,
        handlers::admin_users::edit_user_form,
        handlers::admin_users::edit_user,
        handlers::admin_users::delete_user,
        handlers::reports::get_reports,

        // --- Admin Vehicles ---
        handlers::admin_vehicles::list_vehicles,
        handlers::admin_vehicles::add_vehicle_form,
        handlers::admin_vehicles::add_vehicle,
        handlers::admin_vehicles::edit_vehicle_form,
        handlers::admin_vehicles::edit_vehicle,
        handlers::admin_vehicles::delete_vehicle,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::RoleName,
            models::auth::Role,
            models::auth::User,
            models::auth::UserSummary,
            models::auth::Profile,
            models::auth::LoginUserPayload,
            models::auth::RegisterUserPayload,
            models::auth::AuthResponse,
            models::auth::MessageResponse,
            models::auth::ProfileUpdateResponse,
            models::auth::FormDescriptor,

            // --- Vehicles ---
            models::vehicle::VehicleStatus,
            models::vehicle::Vehicle,
            models::vehicle::CreateVehiclePayload,
            models::vehicle::UpdateVehiclePayload,
            models::vehicle::StatusUpdatePayload,

            // --- Rentals ---
            models::rental::RentalStatus,
            models::rental::Rental,
            models::rental::Payment,
            models::rental::RentPayload,
            models::rental::ActiveRental,
            models::rental::PaymentHistoryEntry,
            handlers::customer::CustomerDashboard,

            // --- Reports ---
            models::report::ReportTotals,
            models::report::RecentRental,
            models::report::ReportSummary,

            // --- Admin payloads ---
            services::user_service::AddUserPayload,
            services::user_service::EditUserPayload,
            services::user_service::ProfilePayload,
            services::user_service::SetRolePayload,
            services::user_service::AdminDashboard,
            services::user_service::EditUserView,
        )
    ),
    tags(
        (name = "Auth", description = "Login, registration and logout"),
        (name = "Profile", description = "Self-service account details"),
        (name = "Customer", description = "Catalog, rentals and payment history"),
        (name = "Staff", description = "Fleet status"),
        (name = "Admin", description = "Users, roles and reports"),
        (name = "Admin Vehicles", description = "Fleet maintenance")
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
