// src/db/user_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::{
        db_utils::{is_foreign_key_violation, is_unique_violation},
        error::AppError,
    },
    models::auth::{NewUser, Role, RoleName, User, UserChanges, UserCredentials, UserSummary},
};

const USER_COLUMNS: &str = "id, name, email, phone, password, role_id";

fn map_email_conflict(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e, "users_email_key") {
        return AppError::EmailAlreadyExists;
    }
    e.into()
}

/// Tudo que os serviços precisam das tabelas 'users' e 'roles'.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_credentials_by_email(&self, email: &str)
        -> Result<Option<UserCredentials>, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError>;

    async fn find_role_id(&self, role: RoleName) -> Result<Option<i32>, AppError>;

    /// Falha com `EmailAlreadyExists` se o e-mail repetir. Nada é gravado.
    async fn create_user(&self, new_user: &NewUser) -> Result<User, AppError>;

    /// `false` se o usuário não existe.
    async fn update_user(&self, id: i32, changes: &UserChanges) -> Result<bool, AppError>;

    /// Falha com `UnknownRole` se o id do cargo não está em 'roles'.
    async fn set_role(&self, id: i32, role_id: i32) -> Result<bool, AppError>;

    async fn delete_user(&self, id: i32) -> Result<bool, AppError>;

    async fn list_users(&self) -> Result<Vec<UserSummary>, AppError>;

    async fn list_roles(&self) -> Result<Vec<Role>, AppError>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    // E-mail exato, diferenciando maiúsculas
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            r#"
            SELECT u.id, u.name, u.password, r.name AS role_name
            FROM users u
            LEFT JOIN roles r ON u.role_id = r.id
            WHERE u.email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(credentials)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_role_id(&self, role: RoleName) -> Result<Option<i32>, AppError> {
        let role_id = sqlx::query_scalar::<_, i32>("SELECT id FROM roles WHERE name = $1")
            .bind(role.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(role_id)
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;

        // Em caso de erro a transação é descartada (rollback).
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, phone, password, role_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.phone)
        .bind(&new_user.password)
        .bind(new_user.role_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return AppError::UnknownRole(new_user.role_id);
            }
            map_email_conflict(e)
        })?;

        tx.commit().await?;
        Ok(user)
    }

    async fn update_user(&self, id: i32, changes: &UserChanges) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $1,
                email = $2,
                phone = $3,
                password = COALESCE($4, password),
                role_id = COALESCE($5, role_id)
            WHERE id = $6
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.phone)
        .bind(changes.password.as_deref())
        .bind(changes.role_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return AppError::UnknownRole(changes.role_id.unwrap_or_default());
            }
            map_email_conflict(e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_role(&self, id: i32, role_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET role_id = $1 WHERE id = $2")
            .bind(role_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    return AppError::UnknownRole(role_id);
                }
                AppError::from(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, id: i32) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, AppError> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.name, u.email, u.role_id, r.name AS role_name
            FROM users u
            LEFT JOIN roles r ON u.role_id = r.id
            ORDER BY u.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>("SELECT id, name FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(roles)
    }
}
