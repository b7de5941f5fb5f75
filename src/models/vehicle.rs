// src/models/vehicle.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "vehicle_status")] // Enum do Postgres, variantes com o mesmo nome
pub enum VehicleStatus {
    Available,
    Rented,
    Maintenance,
}

impl VehicleStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Available" => Some(VehicleStatus::Available),
            "Rented" => Some(VehicleStatus::Rented),
            "Maintenance" => Some(VehicleStatus::Maintenance),
            _ => None,
        }
    }
}

// Linha da tabela 'vehicles'
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: i32,
    #[schema(example = "SUV")]
    pub vehicle_type: String,
    #[schema(example = "Toyota RAV4")]
    pub model: String,
    #[schema(example = "KA-01-AB-1234")]
    pub registration_number: String,
    #[schema(value_type = f64, example = 45.0)]
    pub rental_price: Decimal,
    pub status: VehicleStatus,
}

/// Query string crua do catálogo. Tudo opcional e sem tipo forte, já que
/// entrada ruim é descartada em vez de rejeitada.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "snake_case")]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    #[serde(rename = "type", default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub max_price: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Filtro de veículos. Cada `Some` restringe o resultado.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleFilter {
    pub vehicle_type: Option<String>,
    pub model: Option<String>,
    pub max_price: Option<Decimal>,
    pub status: Option<VehicleStatus>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl VehicleFilter {
    /// Catálogo do cliente: só veículos alugáveis, filtro de status ignorado.
    pub fn for_customer(query: &CatalogQuery) -> Self {
        Self {
            status: Some(VehicleStatus::Available),
            ..Self::from_query(query)
        }
    }

    /// Frota para a equipe: sem status implícito, o explícito vale se for válido.
    pub fn for_staff(query: &CatalogQuery) -> Self {
        Self {
            status: non_blank(&query.status).and_then(|s| VehicleStatus::parse(&s)),
            ..Self::from_query(query)
        }
    }

    fn from_query(query: &CatalogQuery) -> Self {
        Self {
            vehicle_type: non_blank(&query.vehicle_type),
            model: non_blank(&query.model),
            max_price: non_blank(&query.max_price).and_then(|p| Decimal::from_str(&p).ok()),
            status: None,
        }
    }

    /// Mesma semântica do WHERE montado em `db::vehicle_repo::push_filter`.
    #[cfg(test)]
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            needle
                .as_deref()
                .is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
        }

        contains(&vehicle.vehicle_type, &self.vehicle_type)
            && contains(&vehicle.model, &self.model)
            && self.max_price.is_none_or(|max| vehicle.rental_price <= max)
            && self.status.is_none_or(|status| vehicle.status == status)
    }
}

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        return Err(ValidationError::new("price_negative"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehiclePayload {
    #[serde(default)]
    #[validate(length(min = 1, code = "vehicle_fields_required"))]
    pub vehicle_type: String,
    #[serde(default)]
    #[validate(length(min = 1, code = "vehicle_fields_required"))]
    pub model: String,
    #[serde(default)]
    #[validate(length(min = 1, code = "vehicle_fields_required"))]
    pub registration_number: String,
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64)]
    pub rental_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehiclePayload {
    #[serde(default)]
    #[validate(length(min = 1, code = "vehicle_fields_required"))]
    pub vehicle_type: String,
    #[serde(default)]
    #[validate(length(min = 1, code = "vehicle_fields_required"))]
    pub model: String,
    #[serde(default)]
    #[validate(length(min = 1, code = "vehicle_fields_required"))]
    pub registration_number: String,
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64)]
    pub rental_price: Decimal,
    pub status: VehicleStatus,
}

impl CreateVehiclePayload {
    pub fn trimmed(self) -> Self {
        Self {
            vehicle_type: self.vehicle_type.trim().to_string(),
            model: self.model.trim().to_string(),
            registration_number: self.registration_number.trim().to_string(),
            ..self
        }
    }
}

impl UpdateVehiclePayload {
    pub fn trimmed(self) -> Self {
        Self {
            vehicle_type: self.vehicle_type.trim().to_string(),
            model: self.model.trim().to_string(),
            registration_number: self.registration_number.trim().to_string(),
            ..self
        }
    }
}

/// Formulário de status da equipe. Conferido contra o enum na mão para que
/// valores ruins sejam ignorados em vez de rejeitados.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusUpdatePayload {
    #[serde(default)]
    pub status: Option<String>,
}

/// Valores gravados no insert/update.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleDraft {
    pub vehicle_type: String,
    pub model: String,
    pub registration_number: String,
    pub rental_price: Decimal,
    pub status: VehicleStatus,
}

impl From<CreateVehiclePayload> for VehicleDraft {
    fn from(p: CreateVehiclePayload) -> Self {
        Self {
            vehicle_type: p.vehicle_type,
            model: p.model,
            registration_number: p.registration_number,
            rental_price: p.rental_price,
            status: VehicleStatus::Available,
        }
    }
}

impl From<UpdateVehiclePayload> for VehicleDraft {
    fn from(p: UpdateVehiclePayload) -> Self {
        Self {
            vehicle_type: p.vehicle_type,
            model: p.model,
            registration_number: p.registration_number,
            rental_price: p.rental_price,
            status: p.status,
        }
    }
}
