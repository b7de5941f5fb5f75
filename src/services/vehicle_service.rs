// src/services/vehicle_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::VehicleRepository,
    models::vehicle::{Vehicle, VehicleDraft, VehicleFilter, VehicleStatus},
};

/// Manutenção da frota: CRUD do admin e troca de status da equipe.
#[derive(Clone)]
pub struct VehicleService {
    vehicles: Arc<dyn VehicleRepository>,
}

impl VehicleService {
    pub fn new(vehicles: Arc<dyn VehicleRepository>) -> Self {
        Self { vehicles }
    }

    pub async fn list_all(&self) -> Result<Vec<Vehicle>, AppError> {
        self.vehicles.search(&VehicleFilter::default()).await
    }

    pub async fn find(&self, vehicle_id: i32) -> Result<Option<Vehicle>, AppError> {
        self.vehicles.find_by_id(vehicle_id).await
    }

    pub async fn add(&self, draft: VehicleDraft) -> Result<Vehicle, AppError> {
        let vehicle = self.vehicles.create(&draft).await?;
        tracing::info!(vehicle_id = vehicle.id, "Vehicle added to the fleet");
        Ok(vehicle)
    }

    /// O status é gravado como veio, mesmo contradizendo aluguéis abertos.
    pub async fn edit(&self, vehicle_id: i32, draft: VehicleDraft) -> Result<Option<Vehicle>, AppError> {
        self.vehicles.update(vehicle_id, &draft).await
    }

    /// Entrada do formulário da equipe. Valores fora do enum são ignorados (`Ok(false)`).
    pub async fn set_status(&self, vehicle_id: i32, raw_status: Option<&str>) -> Result<bool, AppError> {
        let Some(status) = raw_status.map(str::trim).and_then(VehicleStatus::parse) else {
            tracing::debug!(vehicle_id, ?raw_status, "Ignoring unknown vehicle status");
            return Ok(false);
        };
        let updated = self.vehicles.set_status(vehicle_id, status).await?;
        if updated {
            tracing::info!(vehicle_id, ?status, "Vehicle status changed");
        }
        Ok(updated)
    }

    /// Não verifica aluguéis abertos. Se o banco recusar, a falha é
    /// logada e retorna `false`.
    pub async fn delete(&self, vehicle_id: i32) -> bool {
        match self.vehicles.delete(vehicle_id).await {
            Ok(deleted) => deleted,
            Err(e) => {
                tracing::warn!(vehicle_id, error = %e, "Vehicle deletion refused, rolled back");
                false
            }
        }
    }
}
