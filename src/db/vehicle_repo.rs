// src/db/vehicle_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::{
        db_utils::{contains_pattern, is_unique_violation},
        error::AppError,
    },
    models::vehicle::{Vehicle, VehicleDraft, VehicleFilter, VehicleStatus},
};

const VEHICLE_COLUMNS: &str = "id, vehicle_type, model, registration_number, rental_price, status";

fn map_registration_conflict(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e, "vehicles_registration_number_key") {
        return AppError::RegistrationNumberAlreadyExists;
    }
    e.into()
}

/// Acrescenta um predicado com bind por campo ativo do filtro. O builder
/// já precisa ter uma cláusula `WHERE`.
pub(crate) fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &VehicleFilter) {
    if let Some(vehicle_type) = &filter.vehicle_type {
        builder
            .push(" AND vehicle_type ILIKE ")
            .push_bind(contains_pattern(vehicle_type))
            .push(" ESCAPE '\\'");
    }
    if let Some(model) = &filter.model {
        builder
            .push(" AND model ILIKE ")
            .push_bind(contains_pattern(model))
            .push(" ESCAPE '\\'");
    }
    if let Some(max_price) = filter.max_price {
        builder.push(" AND rental_price <= ").push_bind(max_price);
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status);
    }
}

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn search(&self, filter: &VehicleFilter) -> Result<Vec<Vehicle>, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Vehicle>, AppError>;

    async fn create(&self, draft: &VehicleDraft) -> Result<Vehicle, AppError>;

    /// Sobrescreve todas as colunas, status incluído. `None` se o id não existe.
    async fn update(&self, id: i32, draft: &VehicleDraft) -> Result<Option<Vehicle>, AppError>;

    async fn set_status(&self, id: i32, status: VehicleStatus) -> Result<bool, AppError>;

    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    async fn search(&self, filter: &VehicleFilter) -> Result<Vec<Vehicle>, AppError> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE 1=1"));
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY id");

        let vehicles = builder
            .build_query_as::<Vehicle>()
            .fetch_all(&self.pool)
            .await?;
        Ok(vehicles)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(vehicle)
    }

    async fn create(&self, draft: &VehicleDraft) -> Result<Vehicle, AppError> {
        sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            INSERT INTO vehicles (vehicle_type, model, registration_number, rental_price, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {VEHICLE_COLUMNS}
            "#
        ))
        .bind(&draft.vehicle_type)
        .bind(&draft.model)
        .bind(&draft.registration_number)
        .bind(draft.rental_price)
        .bind(draft.status)
        .fetch_one(&self.pool)
        .await
        .map_err(map_registration_conflict)
    }

    async fn update(&self, id: i32, draft: &VehicleDraft) -> Result<Option<Vehicle>, AppError> {
        sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            UPDATE vehicles
            SET vehicle_type = $1,
                model = $2,
                registration_number = $3,
                rental_price = $4,
                status = $5
            WHERE id = $6
            RETURNING {VEHICLE_COLUMNS}
            "#
        ))
        .bind(&draft.vehicle_type)
        .bind(&draft.model)
        .bind(&draft.registration_number)
        .bind(draft.rental_price)
        .bind(draft.status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_registration_conflict)
    }

    async fn set_status(&self, id: i32, status: VehicleStatus) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE vehicles SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
