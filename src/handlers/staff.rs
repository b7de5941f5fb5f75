// src/handlers/staff.rs

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{RequireRole, StaffAccess},
    },
    models::vehicle::{CatalogQuery, StatusUpdatePayload, Vehicle},
};

// GET /staff
#[utoipa::path(
    get,
    path = "/staff",
    tag = "Staff",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Fleet, optionally filtered", body = [Vehicle]),
        (status = 303, description = "No session or not Staff/Admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    _access: RequireRole<StaffAccess>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<Vehicle>>, ApiError> {
    let vehicles = app_state
        .catalog_service
        .fleet(&query)
        .await
        .map_err(|e| e.to_api_error(locale.0))?;

    Ok(Json(vehicles))
}

// POST /staff/vehicle/{id}/status
#[utoipa::path(
    post,
    path = "/staff/vehicle/{id}/status",
    tag = "Staff",
    request_body = StatusUpdatePayload,
    params(("id" = i32, Path, description = "Vehicle id")),
    responses((status = 303, description = "Back to the staff dashboard; unknown statuses are ignored")),
    security(("api_jwt" = []))
)]
pub async fn update_vehicle_status(
    State(app_state): State<AppState>,
    locale: Locale,
    _access: RequireRole<StaffAccess>,
    Path(vehicle_id): Path<i32>,
    Json(payload): Json<StatusUpdatePayload>,
) -> Result<Redirect, ApiError> {
    app_state
        .vehicle_service
        .set_status(vehicle_id, payload.status.as_deref())
        .await
        .map_err(|e| e.to_api_error(locale.0))?;

    Ok(Redirect::to("/staff"))
}
