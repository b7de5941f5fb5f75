// src/handlers/auth.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};

use crate::{
    common::{error::ApiError, i18n},
    config::AppState,
    handlers::validated,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::{
        AuthResponse, FormDescriptor, Identity, LoginUserPayload, MessageResponse, Profile,
        ProfileUpdateResponse, RegisterUserPayload,
    },
    services::user_service::ProfilePayload,
};

// GET /
#[utoipa::path(
    get,
    path = "/",
    tag = "Auth",
    responses((status = 200, description = "Login form fields", body = FormDescriptor))
)]
pub async fn login_form() -> Json<FormDescriptor> {
    Json(FormDescriptor::new("/", &["email", "password"]))
}

// POST /
#[utoipa::path(
    post,
    path = "/",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Session token and the dashboard to open", body = AuthResponse),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    let payload = validated(payload, &locale)?;

    let outcome = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await
        .map_err(|e| e.to_api_error(locale.0))?;

    Ok(Json(AuthResponse {
        redirect_to: outcome.identity.dashboard_path().to_string(),
        token: outcome.token,
    }))
}

// GET /register
#[utoipa::path(
    get,
    path = "/register",
    tag = "Auth",
    responses((status = 200, description = "Registration form fields", body = FormDescriptor))
)]
pub async fn register_form() -> Json<FormDescriptor> {
    Json(FormDescriptor::new("/register", &["name", "email", "phone", "password"]))
}

// POST /register
#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 400, description = "Name, email or password missing"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = validated(payload.trimmed(), &locale)?;

    app_state
        .auth_service
        .register_user(&payload)
        .await
        .map_err(|e| e.to_api_error(locale.0))?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: i18n::message(locale.0, "account_created"),
        }),
    ))
}

// GET /logout
#[utoipa::path(
    get,
    path = "/logout",
    tag = "Auth",
    responses((status = 303, description = "Client drops its token; back to login"))
)]
pub async fn logout() -> Redirect {
    Redirect::to("/")
}

// GET /profile
#[utoipa::path(
    get,
    path = "/profile",
    tag = "Profile",
    responses(
        (status = 200, description = "Own account details", body = Profile),
        (status = 303, description = "No session, or the account is gone")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_profile(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<axum::response::Response, ApiError> {
    let profile = app_state
        .user_service
        .profile(identity.user_id)
        .await
        .map_err(|e| e.to_api_error(locale.0))?;

    Ok(match profile {
        Some(profile) => Json(profile).into_response(),
        None => Redirect::to("/").into_response(),
    })
}

// POST /profile
#[utoipa::path(
    post,
    path = "/profile",
    tag = "Profile",
    request_body = ProfilePayload,
    responses(
        (status = 200, description = "Saved; carries a re-issued token", body = ProfileUpdateResponse),
        (status = 400, description = "Name or email missing"),
        (status = 409, description = "Email already in use")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(identity): AuthenticatedUser,
    Json(payload): Json<ProfilePayload>,
) -> Result<axum::response::Response, ApiError> {
    let payload = validated(payload.trimmed(), &locale)?;

    let Some(profile) = app_state
        .user_service
        .update_profile(identity.user_id, payload)
        .await
        .map_err(|e| e.to_api_error(locale.0))?
    else {
        return Ok(Redirect::to("/").into_response());
    };

    let token = app_state
        .auth_service
        .create_token(&Identity {
            name: profile.name.clone(),
            ..identity
        })
        .map_err(|e| e.to_api_error(locale.0))?;

    Ok(Json(ProfileUpdateResponse {
        profile,
        token,
        message: i18n::message(locale.0, "profile_updated"),
    })
    .into_response())
}
