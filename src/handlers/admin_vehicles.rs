// src/handlers/admin_vehicles.rs

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    handlers::validated,
    middleware::{
        i18n::Locale,
        rbac::{AdminAccess, RequireRole},
    },
    models::{
        auth::FormDescriptor,
        vehicle::{CreateVehiclePayload, UpdateVehiclePayload, Vehicle, VehicleDraft},
    },
};

const VEHICLE_ADMIN: &str = "/admin/vehicles";

// GET /admin/vehicles
#[utoipa::path(
    get,
    path = "/admin/vehicles",
    tag = "Admin Vehicles",
    responses(
        (status = 200, description = "Every vehicle", body = [Vehicle]),
        (status = 303, description = "No session or not Admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_vehicles(
    State(app_state): State<AppState>,
    locale: Locale,
    _access: RequireRole<AdminAccess>,
) -> Result<Json<Vec<Vehicle>>, ApiError> {
    let vehicles = app_state
        .vehicle_service
        .list_all()
        .await
        .map_err(|e| e.to_api_error(locale.0))?;

    Ok(Json(vehicles))
}

// GET /admin/vehicles/add
#[utoipa::path(
    get,
    path = "/admin/vehicles/add",
    tag = "Admin Vehicles",
    responses(
        (status = 200, description = "Add-vehicle form fields", body = FormDescriptor),
        (status = 303, description = "No session or not Admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_vehicle_form(_access: RequireRole<AdminAccess>) -> Json<FormDescriptor> {
    Json(FormDescriptor::new(
        "/admin/vehicles/add",
        &["vehicleType", "model", "registrationNumber", "rentalPrice"],
    ))
}

// POST /admin/vehicles/add
#[utoipa::path(
    post,
    path = "/admin/vehicles/add",
    tag = "Admin Vehicles",
    request_body = CreateVehiclePayload,
    responses(
        (status = 303, description = "Vehicle added as Available"),
        (status = 400, description = "Missing fields or negative price"),
        (status = 409, description = "Registration number already exists")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_vehicle(
    State(app_state): State<AppState>,
    locale: Locale,
    _access: RequireRole<AdminAccess>,
    Json(payload): Json<CreateVehiclePayload>,
) -> Result<Redirect, ApiError> {
    let payload = validated(payload.trimmed(), &locale)?;

    app_state
        .vehicle_service
        .add(VehicleDraft::from(payload))
        .await
        .map_err(|e| e.to_api_error(locale.0))?;

    Ok(Redirect::to(VEHICLE_ADMIN))
}

// GET /admin/vehicles/edit/{id}
#[utoipa::path(
    get,
    path = "/admin/vehicles/edit/{id}",
    tag = "Admin Vehicles",
    params(("id" = i32, Path, description = "Vehicle id")),
    responses(
        (status = 200, description = "Vehicle for the edit form", body = Vehicle),
        (status = 303, description = "No such vehicle")
    ),
    security(("api_jwt" = []))
)]
pub async fn edit_vehicle_form(
    State(app_state): State<AppState>,
    locale: Locale,
    _access: RequireRole<AdminAccess>,
    Path(vehicle_id): Path<i32>,
) -> Result<Response, ApiError> {
    let vehicle = app_state
        .vehicle_service
        .find(vehicle_id)
        .await
        .map_err(|e| e.to_api_error(locale.0))?;

    Ok(match vehicle {
        Some(vehicle) => Json(vehicle).into_response(),
        None => Redirect::to(VEHICLE_ADMIN).into_response(),
    })
}

// POST /admin/vehicles/edit/{id}
#[utoipa::path(
    post,
    path = "/admin/vehicles/edit/{id}",
    tag = "Admin Vehicles",
    request_body = UpdateVehiclePayload,
    params(("id" = i32, Path, description = "Vehicle id")),
    responses(
        (status = 303, description = "Saved, or no such vehicle"),
        (status = 400, description = "Missing fields or negative price"),
        (status = 409, description = "Registration number already exists")
    ),
    security(("api_jwt" = []))
)]
pub async fn edit_vehicle(
    State(app_state): State<AppState>,
    locale: Locale,
    _access: RequireRole<AdminAccess>,
    Path(vehicle_id): Path<i32>,
    Json(payload): Json<UpdateVehiclePayload>,
) -> Result<Redirect, ApiError> {
    let payload = validated(payload.trimmed(), &locale)?;

    app_state
        .vehicle_service
        .edit(vehicle_id, VehicleDraft::from(payload))
        .await
        .map_err(|e| e.to_api_error(locale.0))?;

    Ok(Redirect::to(VEHICLE_ADMIN))
}

// GET /admin/vehicles/delete/{id}
#[utoipa::path(
    get,
    path = "/admin/vehicles/delete/{id}",
    tag = "Admin Vehicles",
    params(("id" = i32, Path, description = "Vehicle id")),
    responses((status = 303, description = "Back to the vehicle list, deleted or not")),
    security(("api_jwt" = []))
)]
pub async fn delete_vehicle(
    State(app_state): State<AppState>,
    _access: RequireRole<AdminAccess>,
    Path(vehicle_id): Path<i32>,
) -> Redirect {
    app_state.vehicle_service.delete(vehicle_id).await;
    Redirect::to(VEHICLE_ADMIN)
}
