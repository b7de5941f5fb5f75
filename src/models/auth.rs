// src/models/auth.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Os três níveis de permissão semeados na tabela `roles`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RoleName {
    Admin,
    Staff,
    Customer,
}

impl RoleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "Admin",
            RoleName::Staff => "Staff",
            RoleName::Customer => "Customer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Admin" => Some(RoleName::Admin),
            "Staff" => Some(RoleName::Staff),
            "Customer" => Some(RoleName::Customer),
            _ => None,
        }
    }
}

// Linha da tabela 'roles'
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "Customer")]
    pub name: String,
}

// Linha da tabela 'users'
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,

    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password: String,

    pub role_id: i32,
}

/// O que o login precisa: a senha gravada e o nome do cargo.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: i32,
    pub name: String,
    pub password: String,
    pub role_name: Option<String>,
}

/// Uma linha da lista de usuários do admin.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role_id: i32,
    pub role_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<User> for Profile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role_id: i32,
}

/// Novos valores para um usuário existente. `None` mantém o atual.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: Option<String>,
    pub role_id: Option<i32>,
}

// Claims do JWT. O token é a sessão inteira.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub name: String,
    pub role: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

/// Identidade da requisição entregue a todo handler protegido.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i32,
    pub name: String,
    pub role: Option<RoleName>,
}

impl Identity {
    pub fn has_role(&self, allowed: &[RoleName]) -> bool {
        self.role.is_some_and(|role| allowed.contains(&role))
    }

    /// Para onde o cliente vai depois do login.
    pub fn dashboard_path(&self) -> &'static str {
        match self.role {
            Some(RoleName::Admin) => "/admin",
            Some(RoleName::Staff) => "/staff",
            _ => "/customer",
        }
    }
}

// Formulário de login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[serde(default)]
    #[validate(length(min = 1, code = "credentials_required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, code = "credentials_required"))]
    pub password: String,
}

// Formulário de cadastro. Telefone é opcional.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserPayload {
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
}

impl RegisterUserPayload {
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            password: self.password.trim().to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[schema(example = "/customer")]
    pub redirect_to: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// O perfil salvo volta com um token novo, já com o nome novo.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileUpdateResponse {
    pub profile: Profile,
    pub token: String,
    pub message: String,
}

/// Descreve um formulário para o cliente renderizar (o serviço não gera HTML).
#[derive(Debug, Serialize, ToSchema)]
pub struct FormDescriptor {
    pub action: String,
    pub fields: Vec<String>,
}

impl FormDescriptor {
    pub fn new(action: &str, fields: &[&str]) -> Self {
        Self {
            action: action.to_string(),
            fields: fields.iter().map(|field| field.to_string()).collect(),
        }
    }
}
