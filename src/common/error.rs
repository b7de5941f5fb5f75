use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::{self, Language};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("email already in use")]
    EmailAlreadyExists,

    #[error("account could not be created")]
    AccountNotCreated,

    #[error("registration number already in use")]
    RegistrationNumberAlreadyExists,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid or expired session token")]
    InvalidToken,

    #[error("role {0} does not exist")]
    UnknownRole(i32),

    #[error("rental length of {0} days is out of range")]
    RentalDaysOutOfRange(i64),

    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Corpo JSON de toda requisição que falha.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    fn plain(status: StatusCode, language: Language, key: &str) -> Self {
        Self {
            status,
            error: i18n::message(language, key),
            details: None,
        }
    }
}

impl AppError {
    pub fn to_api_error(&self, language: Language) -> ApiError {
        match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                let mut first_code = None;
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| i18n::message(language, &e.code))
                        .collect();
                    if first_code.is_none() {
                        first_code = field_errors.first().map(|e| e.code.to_string());
                    }
                    details.insert(field.to_string(), json!(messages));
                }
                let key = first_code.unwrap_or_else(|| "validation_failed".to_string());
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: i18n::message(language, &key),
                    details: Some(Value::Object(details)),
                }
            }
            AppError::EmailAlreadyExists => {
                ApiError::plain(StatusCode::CONFLICT, language, "email_in_use")
            }
            AppError::AccountNotCreated => {
                ApiError::plain(StatusCode::CONFLICT, language, "account_not_created")
            }
            AppError::RegistrationNumberAlreadyExists => {
                ApiError::plain(StatusCode::CONFLICT, language, "registration_number_in_use")
            }
            AppError::InvalidCredentials | AppError::InvalidToken => {
                ApiError::plain(StatusCode::UNAUTHORIZED, language, "invalid_credentials")
            }
            AppError::UnknownRole(_) => {
                ApiError::plain(StatusCode::BAD_REQUEST, language, "unknown_role")
            }
            AppError::RentalDaysOutOfRange(_) => {
                ApiError::plain(StatusCode::BAD_REQUEST, language, "rental_days_out_of_range")
            }
            e => {
                tracing::error!("Internal server error: {}", e);
                ApiError::plain(StatusCode::INTERNAL_SERVER_ERROR, language, "internal_error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(Language::default()).into_response()
    }
}
