pub mod admin_users;
pub mod admin_vehicles;
pub mod auth;
pub mod customer;
pub mod reports;
pub mod staff;

use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    middleware::i18n::Locale,
};

/// Roda as regras de validação do payload e responde 400 no idioma do cliente.
pub(crate) fn validated<T: Validate>(payload: T, locale: &Locale) -> Result<T, ApiError> {
    payload
        .validate()
        .map_err(|errors| AppError::from(errors).to_api_error(locale.0))?;
    Ok(payload)
}
