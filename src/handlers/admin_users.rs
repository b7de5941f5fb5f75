// src/handlers/admin_users.rs

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
    models::auth::Role,
    services::user_service::{
        AddUserPayload, AdminDashboard, DeleteOutcome, EditUserPayload, EditUserView,
        SetRolePayload,
    },
};

const ADMIN_DASHBOARD: &str = "/admin";

// GET /admin
#[utoipa::path(
    get,
    path = "/admin",
    tag = "Admin",
    responses(
        (status = 200, description = "All users with their role, plus the roles", body = AdminDashboard),
        (status = 303, description = "No session or not Admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    _access: RequireRole<AdminAccess>,
) -> Result<Json<AdminDashboard>, ApiError> {
    let dashboard = app_state
        .user_service
        .admin_dashboard()
        .await
        .map_err(|e| e.to_api_error(locale.0))?;

    Ok(Json(dashboard))
}

// POST /admin/user/{id}/set_role
#[utoipa::path(
    post,
    path = "/admin/user/{id}/set_role",
    tag = "Admin",
    request_body = SetRolePayload,
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 303, description = "Back to the admin dashboard"),
        (status = 400, description = "Role does not exist")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_role(
    State(app_state): State<AppState>,
    locale: Locale,
    _access: RequireRole<AdminAccess>,
    Path(user_id): Path<i32>,
    Json(payload): Json<SetRolePayload>,
) -> Result<Redirect, ApiError> {
    app_state
        .user_service
        .set_role(user_id, payload.role_id)
        .await
        .map_err(|e| e.to_api_error(locale.0))?;

    Ok(Redirect::to(ADMIN_DASHBOARD))
}

// GET /admin/users/add
#[utoipa::path(
    get,
    path = "/admin/users/add",
    tag = "Admin",
    responses((status = 200, description = "Roles for the add-user form", body = [Role])),
    security(("api_jwt" = []))
)]
pub async fn add_user_form(
    State(app_state): State<AppState>,
    locale: Locale,
    _access: RequireRole<AdminAccess>,
) -> Result<Json<Vec<Role>>, ApiError> {
    let roles = app_state
        .user_service
        .list_roles()
        .await
        .map_err(|e| e.to_api_error(locale.0))?;

    Ok(Json(roles))
}

// POST /admin/users/add
#[utoipa::path(
    post,
    path = "/admin/users/add",
    tag = "Admin",
    request_body = AddUserPayload,
    responses(
        (status = 303, description = "User created"),
        (status = 400, description = "Name, email or password missing"),
        (status = 409, description = "Email already in use")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_user(
    State(app_state): State<AppState>,
    locale: Locale,
    _access: RequireRole<AdminAccess>,
    Json(payload): Json<AddUserPayload>,
) -> Result<Redirect, ApiError> {
    let payload = validated(payload.trimmed(), &locale)?;

    app_state
        .user_service
        .add_user(payload)
        .await
        .map_err(|e| e.to_api_error(locale.0))?;

    Ok(Redirect::to(ADMIN_DASHBOARD))
}

// GET /admin/users/edit/{id}
#[utoipa::path(
    get,
    path = "/admin/users/edit/{id}",
    tag = "Admin",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User and roles for the edit form", body = EditUserView),
        (status = 303, description = "No such user")
    ),
    security(("api_jwt" = []))
)]
pub async fn edit_user_form(
    State(app_state): State<AppState>,
    locale: Locale,
    _access: RequireRole<AdminAccess>,
    Path(user_id): Path<i32>,
) -> Result<Response, ApiError> {
    let view = app_state
        .user_service
        .edit_user_view(user_id)
        .await
        .map_err(|e| e.to_api_error(locale.0))?;

    Ok(match view {
        Some(view) => Json(view).into_response(),
        None => Redirect::to(ADMIN_DASHBOARD).into_response(),
    })
}

// POST /admin/users/edit/{id}
#[utoipa::path(
    post,
    path = "/admin/users/edit/{id}",
    tag = "Admin",
    request_body = EditUserPayload,
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 303, description = "Saved, or no such user"),
        (status = 400, description = "Name or email missing"),
        (status = 409, description = "Email already in use")
    ),
    security(("api_jwt" = []))
)]
pub async fn edit_user(
    State(app_state): State<AppState>,
    locale: Locale,
    _access: RequireRole<AdminAccess>,
    Path(user_id): Path<i32>,
    Json(payload): Json<EditUserPayload>,
) -> Result<Redirect, ApiError> {
    let payload = validated(payload.trimmed(), &locale)?;

    app_state
        .user_service
        .edit_user(user_id, payload)
        .await
        .map_err(|e| e.to_api_error(locale.0))?;

    Ok(Redirect::to(ADMIN_DASHBOARD))
}

// GET /admin/users/delete/{id}
#[utoipa::path(
    get,
    path = "/admin/users/delete/{id}",
    tag = "Admin",
    params(("id" = i32, Path, description = "User id")),
    responses((status = 303, description = "Back to the admin dashboard, deleted or not")),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    access: RequireRole<AdminAccess>,
    Path(user_id): Path<i32>,
) -> Redirect {
    let outcome = app_state
        .user_service
        .delete_user(access.identity.user_id, user_id)
        .await;
    if outcome == DeleteOutcome::SelfDeletionBlocked {
        tracing::debug!(user_id, "Admin tried to delete their own account");
    }

    Redirect::to(ADMIN_DASHBOARD)
}
