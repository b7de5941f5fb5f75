// src/services/catalog_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::VehicleRepository,
    models::vehicle::{CatalogQuery, Vehicle, VehicleFilter},
};

#[derive(Clone)]
pub struct CatalogService {
    vehicles: Arc<dyn VehicleRepository>,
}

impl CatalogService {
    pub fn new(vehicles: Arc<dyn VehicleRepository>) -> Self {
        Self { vehicles }
    }

    /// O que o cliente pode alugar agora.
    pub async fn available_vehicles(&self, query: &CatalogQuery) -> Result<Vec<Vehicle>, AppError> {
        self.vehicles.search(&VehicleFilter::for_customer(query)).await
    }

    /// A frota inteira, opcionalmente filtrada por status.
    pub async fn fleet(&self, query: &CatalogQuery) -> Result<Vec<Vehicle>, AppError> {
        self.vehicles.search(&VehicleFilter::for_staff(query)).await
    }
}
