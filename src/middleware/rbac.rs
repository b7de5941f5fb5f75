// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    middleware::auth::{AuthenticatedUser, LoginRedirect},
    models::auth::{Identity, RoleName},
};

/// Grupo nomeado de cargos com acesso a uma área.
pub trait RoleSet: Send + Sync + 'static {
    fn allowed() -> &'static [RoleName];
}

/// Extrator guardião: o cargo da sessão precisa pertencer a `T`.
pub struct RequireRole<T> {
    pub identity: Identity,
    _area: PhantomData<T>,
}

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleSet,
    S: Send + Sync,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(identity) = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !identity.has_role(T::allowed()) {
            tracing::debug!(user_id = identity.user_id, role = ?identity.role, "Role not allowed here");
            return Err(LoginRedirect);
        }

        Ok(RequireRole {
            identity,
            _area: PhantomData,
        })
    }
}

pub struct StaffAccess;
impl RoleSet for StaffAccess {
    fn allowed() -> &'static [RoleName] {
        &[RoleName::Staff, RoleName::Admin]
    }
}

pub struct AdminAccess;
impl RoleSet for AdminAccess {
    fn allowed() -> &'static [RoleName] {
        &[RoleName::Admin]
    }
}
