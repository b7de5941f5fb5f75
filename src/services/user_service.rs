// src/services/user_service.rs

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{NewUser, Profile, Role, RoleName, User, UserChanges, UserSummary},
};

/// Usado quando a tabela 'roles' não tem a linha Customer. Igual ao id do seed.
pub const CUSTOMER_ROLE_FALLBACK_ID: i32 = 3;

pub(crate) async fn resolve_customer_role(users: &dyn UserRepository) -> Result<i32, AppError> {
    match users.find_role_id(RoleName::Customer).await? {
        Some(role_id) => Ok(role_id),
        None => {
            tracing::warn!(
                fallback = CUSTOMER_ROLE_FALLBACK_ID,
                "Customer role missing from roles table, using fallback id"
            );
            Ok(CUSTOMER_ROLE_FALLBACK_ID)
        }
    }
}

/// Quando nem o id de fallback existe em 'roles', a FK recusa o insert e o
/// cliente recebe a falha genérica de criação de conta.
pub(crate) fn customer_role_missing(err: AppError) -> AppError {
    match err {
        AppError::UnknownRole(role_id) => {
            tracing::error!(role_id, "Customer role not found, account not created");
            AppError::AccountNotCreated
        }
        other => other,
    }
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddUserPayload {
    #[serde(default)]
    #[validate(length(min = 1, code = "registration_fields_required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, code = "registration_fields_required"))]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    #[validate(length(min = 1, code = "registration_fields_required"))]
    pub password: String,
    /// Sem valor, vira Customer.
    pub role_id: Option<i32>,
}

impl AddUserPayload {
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            password: self.password.trim().to_string(),
            role_id: self.role_id,
        }
    }
}

/// Formulário de edição do admin. Senha em branco mantém a atual.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditUserPayload {
    #[serde(default)]
    #[validate(length(min = 1, code = "profile_fields_required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, code = "profile_fields_required"))]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
    pub role_id: Option<i32>,
}

impl EditUserPayload {
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            password: self.password.trim().to_string(),
            role_id: self.role_id,
        }
    }

    fn into_changes(self) -> UserChanges {
        UserChanges {
            name: self.name,
            email: self.email,
            phone: self.phone,
            password: (!self.password.is_empty()).then_some(self.password),
            role_id: self.role_id,
        }
    }
}

/// Formulário do próprio perfil. Senha em branco mantém a atual.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProfilePayload {
    #[serde(default)]
    #[validate(length(min = 1, code = "profile_fields_required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, code = "profile_fields_required"))]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
}

impl ProfilePayload {
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            password: self.password.trim().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetRolePayload {
    pub role_id: i32,
}

// --- VIEWS ---

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminDashboard {
    pub users: Vec<UserSummary>,
    pub roles: Vec<Role>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EditUserView {
    pub user: User,
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    SelfDeletionBlocked,
    /// O banco recusou (ex.: há aluguéis apontando para o usuário).
    Refused,
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn admin_dashboard(&self) -> Result<AdminDashboard, AppError> {
        Ok(AdminDashboard {
            users: self.users.list_users().await?,
            roles: self.users.list_roles().await?,
        })
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        self.users.list_roles().await
    }

    pub async fn add_user(&self, payload: AddUserPayload) -> Result<User, AppError> {
        let (role_id, default_role) = match payload.role_id {
            Some(role_id) => (role_id, false),
            None => (resolve_customer_role(self.users.as_ref()).await?, true),
        };

        let user = self
            .users
            .create_user(&NewUser {
                name: payload.name,
                email: payload.email,
                phone: payload.phone,
                password: payload.password,
                role_id,
            })
            .await
            .map_err(|e| if default_role { customer_role_missing(e) } else { e })?;

        tracing::info!(user_id = user.id, role_id, "User created by admin");
        Ok(user)
    }

    /// `None` se o usuário não existe.
    pub async fn edit_user_view(&self, user_id: i32) -> Result<Option<EditUserView>, AppError> {
        let Some(user) = self.users.find_by_id(user_id).await? else {
            return Ok(None);
        };
        Ok(Some(EditUserView {
            user,
            roles: self.users.list_roles().await?,
        }))
    }

    /// `false` se o usuário não existe.
    pub async fn edit_user(&self, user_id: i32, payload: EditUserPayload) -> Result<bool, AppError> {
        self.users.update_user(user_id, &payload.into_changes()).await
    }

    /// Não verifica se o cargo existe; quem decide é a FK.
    pub async fn set_role(&self, user_id: i32, role_id: i32) -> Result<bool, AppError> {
        let updated = self.users.set_role(user_id, role_id).await?;
        if updated {
            tracing::info!(user_id, role_id, "Role reassigned");
        }
        Ok(updated)
    }

    /// Falhas do banco são logadas e viram `Refused`, nunca erro.
    pub async fn delete_user(&self, acting_user_id: i32, user_id: i32) -> DeleteOutcome {
        if acting_user_id == user_id {
            return DeleteOutcome::SelfDeletionBlocked;
        }

        match self.users.delete_user(user_id).await {
            Ok(true) => {
                tracing::info!(user_id, "User deleted");
                DeleteOutcome::Deleted
            }
            Ok(false) => DeleteOutcome::NotFound,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "User deletion refused, rolled back");
                DeleteOutcome::Refused
            }
        }
    }

    pub async fn profile(&self, user_id: i32) -> Result<Option<Profile>, AppError> {
        Ok(self.users.find_by_id(user_id).await?.map(Profile::from))
    }

    /// Edição do próprio perfil: o cargo nunca muda. `None` se a conta
    /// não existe mais.
    pub async fn update_profile(
        &self,
        user_id: i32,
        payload: ProfilePayload,
    ) -> Result<Option<Profile>, AppError> {
        let changes = UserChanges {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            password: (!payload.password.is_empty()).then_some(payload.password),
            role_id: None,
        };
        if !self.users.update_user(user_id, &changes).await? {
            return Ok(None);
        }
        self.profile(user_id).await
    }
}
