// src/handlers/customer.rs

use axum::{
    extract::{FromRequest, Path, Query, Request, State},
    http::header,
    response::Redirect,
    Form, Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        rental::{ActiveRental, PaymentHistoryEntry, RentPayload},
        vehicle::{CatalogQuery, Vehicle},
    },
};

const CUSTOMER_DASHBOARD: &str = "/customer";

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDashboard {
    pub vehicles: Vec<Vehicle>,
    pub active_rentals: Vec<ActiveRental>,
}

// GET /customer
#[utoipa::path(
    get,
    path = "/customer",
    tag = "Customer",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Rentable vehicles and own open rentals", body = CustomerDashboard),
        (status = 303, description = "No session")
    ),
    security(("api_jwt" = []))
)]
pub async fn dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(identity): AuthenticatedUser,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CustomerDashboard>, ApiError> {
    let vehicles = app_state
        .catalog_service
        .available_vehicles(&query)
        .await
        .map_err(|e| e.to_api_error(locale.0))?;

    let active_rentals = app_state
        .rental_service
        .active_rentals(identity.user_id)
        .await
        .map_err(|e| e.to_api_error(locale.0))?;

    Ok(Json(CustomerDashboard { vehicles, active_rentals }))
}

// POST /customer/rent/{vehicle_id}
#[utoipa::path(
    post,
    path = "/customer/rent/{vehicle_id}",
    tag = "Customer",
    request_body(
        content(
            (RentPayload = "application/json"),
            (RentPayload = "application/x-www-form-urlencoded")
        ),
        description = "Rental length; defaults to one day"
    ),
    params(("vehicle_id" = i32, Path, description = "Vehicle to rent")),
    responses(
        (status = 303, description = "Back to the dashboard, rented or not"),
        (status = 400, description = "Rental length out of range")
    ),
    security(("api_jwt" = []))
)]
pub async fn rent_vehicle(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(vehicle_id): Path<i32>,
    request: Request,
) -> Result<Redirect, ApiError> {
    let days = rent_days(request).await;

    app_state
        .rental_service
        .rent(identity.user_id, vehicle_id, days)
        .await
        .map_err(|e| e.to_api_error(locale.0))?;

    Ok(Redirect::to(CUSTOMER_DASHBOARD))
}

/// Aceita JSON ou formulário. Corpo ausente ou ilegível vale um dia.
async fn rent_days(request: Request) -> Option<i64> {
    let is_form = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

    let payload = if is_form {
        Form::<RentPayload>::from_request(request, &()).await.ok().map(|Form(p)| p)
    } else {
        Json::<RentPayload>::from_request(request, &()).await.ok().map(|Json(p)| p)
    };

    payload.and_then(|p| p.days)
}

// GET /customer/return/{rental_id}
#[utoipa::path(
    get,
    path = "/customer/return/{rental_id}",
    tag = "Customer",
    params(("rental_id" = i32, Path, description = "Own active rental")),
    responses((status = 303, description = "Back to the dashboard, returned or not")),
    security(("api_jwt" = []))
)]
pub async fn return_vehicle(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(rental_id): Path<i32>,
) -> Result<Redirect, ApiError> {
    app_state
        .rental_service
        .return_rental(identity.user_id, rental_id)
        .await
        .map_err(|e| e.to_api_error(locale.0))?;

    Ok(Redirect::to(CUSTOMER_DASHBOARD))
}

// GET /customer/payments
#[utoipa::path(
    get,
    path = "/customer/payments",
    tag = "Customer",
    responses((status = 200, description = "Own payments, newest first", body = [PaymentHistoryEntry])),
    security(("api_jwt" = []))
)]
pub async fn payment_history(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<Json<Vec<PaymentHistoryEntry>>, ApiError> {
    let payments = app_state
        .rental_service
        .payment_history(identity.user_id)
        .await
        .map_err(|e| e.to_api_error(locale.0))?;

    Ok(Json(payments))
}
