// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers::{admin_users, admin_vehicles, auth, customer, reports, staff},
    middleware::auth::session_guard,
};

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn build_router(app_state: AppState) -> Router {
    // Acessíveis sem sessão
    let public_routes = Router::new()
        .route("/", get(auth::login_form).post(auth::login))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/logout", get(auth::logout))
        .route("/api/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(openapi_json));

    // O cargo é checado em cada handler via `RequireRole`
    let session_routes = Router::new()
        .route(
            "/profile",
            get(auth::get_profile).post(auth::update_profile),
        )
        .route("/customer", get(customer::dashboard))
        .route("/customer/rent/{vehicle_id}", post(customer::rent_vehicle))
        .route("/customer/return/{rental_id}", get(customer::return_vehicle))
        .route("/customer/payments", get(customer::payment_history))
        .route("/staff", get(staff::dashboard))
        .route("/staff/vehicle/{id}/status", post(staff::update_vehicle_status))
        .route("/admin", get(admin_users::dashboard))
        .route("/admin/user/{id}/set_role", post(admin_users::set_role))
        .route(
            "/admin/users/add",
            get(admin_users::add_user_form).post(admin_users::add_user),
        )
        .route(
            "/admin/users/edit/{id}",
            get(admin_users::edit_user_form).post(admin_users::edit_user),
        )
        .route("/admin/users/delete/{id}", get(admin_users::delete_user))
        .route("/admin/reports", get(reports::get_reports))
        .route("/admin/vehicles", get(admin_vehicles::list_vehicles))
        .route(
            "/admin/vehicles/add",
            get(admin_vehicles::add_vehicle_form).post(admin_vehicles::add_vehicle),
        )
        .route(
            "/admin/vehicles/edit/{id}",
            get(admin_vehicles::edit_vehicle_form).post(admin_vehicles::edit_vehicle),
        )
        .route("/admin/vehicles/delete/{id}", get(admin_vehicles::delete_vehicle))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            session_guard,
        ));

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .with_state(app_state)
}
