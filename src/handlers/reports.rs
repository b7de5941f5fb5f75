// src/handlers/reports.rs

use axum::{extract::State, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{AdminAccess, RequireRole},
    },
    models::report::ReportSummary,
};

// GET /admin/reports
#[utoipa::path(
    get,
    path = "/admin/reports",
    tag = "Admin",
    responses(
        (status = 200, description = "Counts, revenue and the latest rentals and payments", body = ReportSummary),
        (status = 303, description = "No session or not Admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_reports(
    State(app_state): State<AppState>,
    locale: Locale,
    _access: RequireRole<AdminAccess>,
) -> Result<Json<ReportSummary>, ApiError> {
    let summary = app_state
        .report_service
        .summary()
        .await
        .map_err(|e| e.to_api_error(locale.0))?;

    Ok(Json(summary))
}
