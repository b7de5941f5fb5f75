// src/services/auth.rs

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, Identity, NewUser, RegisterUserPayload, RoleName, User},
    services::user_service::{customer_role_missing, resolve_customer_role},
};

/// Segredo de assinatura e validade dos tokens de sessão.
#[derive(Clone)]
pub struct SessionKeys {
    secret: String,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self { secret: secret.into(), ttl }
    }
}

/// Resultado de um login bem-sucedido.
#[derive(Debug)]
pub struct LoginOutcome {
    pub token: String,
    pub identity: Identity,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    keys: SessionKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, keys: SessionKeys) -> Self {
        Self { users, keys }
    }

    /// Compara a senha literalmente. E-mail desconhecido e senha errada dão
    /// o mesmo `InvalidCredentials`.
    pub async fn login_user(&self, email: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let credentials = self
            .users
            .find_credentials_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if credentials.password != password {
            return Err(AppError::InvalidCredentials);
        }

        let identity = Identity {
            user_id: credentials.id,
            name: credentials.name,
            role: credentials.role_name.as_deref().and_then(RoleName::parse),
        };
        let token = self.create_token(&identity)?;

        tracing::info!(user_id = identity.user_id, "User logged in");
        Ok(LoginOutcome { token, identity })
    }

    /// Cria uma conta Customer. Espera o payload já aparado e validado.
    pub async fn register_user(&self, payload: &RegisterUserPayload) -> Result<User, AppError> {
        let role_id = resolve_customer_role(self.users.as_ref()).await?;

        let user = self
            .users
            .create_user(&NewUser {
                name: payload.name.clone(),
                email: payload.email.clone(),
                phone: payload.phone.clone(),
                password: payload.password.clone(),
                role_id,
            })
            .await
            .map_err(customer_role_missing)?;

        tracing::info!(user_id = user.id, "Customer account registered");
        Ok(user)
    }

    pub fn validate_token(&self, token: &str) -> Result<Identity, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.keys.secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        let claims = token_data.claims;
        Ok(Identity {
            user_id: claims.sub,
            name: claims.name,
            role: claims.role.as_deref().and_then(RoleName::parse),
        })
    }

    pub fn create_token(&self, identity: &Identity) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.keys.ttl;

        let claims = Claims {
            sub: identity.user_id,
            name: identity.name.clone(),
            role: identity.role.map(|role| role.as_str().to_string()),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.keys.secret.as_ref()),
        )?)
    }
}
