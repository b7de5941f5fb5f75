// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::common::i18n::Language;

/// Idioma das mensagens de erro, tirado da primeira tag de `Accept-Language`.
pub struct Locale(pub Language);

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let language = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| accept_language::parse(raw).first().map(|tag| Language::from_tag(tag)))
            .unwrap_or_default();

        Ok(Locale(language))
    }
}
