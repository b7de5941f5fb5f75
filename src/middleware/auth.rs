// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{config::AppState, models::auth::Identity};

/// Falha na identificação: volta para a tela de login, sem corpo.
#[derive(Debug)]
pub struct LoginRedirect;

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to("/").into_response()
    }
}

/// Valida o token bearer e guarda a `Identity` nas extensions da requisição
/// para os handlers atrás dele.
pub async fn session_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, LoginRedirect> {
    let Some(Authorization(bearer)) = request.headers().typed_get::<Authorization<Bearer>>() else {
        return Err(LoginRedirect);
    };

    let identity = app_state
        .auth_service
        .validate_token(bearer.token())
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            LoginRedirect
        })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Extrator da identidade que o `session_guard` anexou à requisição.
pub struct AuthenticatedUser(pub Identity);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(LoginRedirect)
    }
}
