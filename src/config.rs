// src/config.rs

use std::{env, sync::Arc};

use anyhow::Context;
use sqlx::PgPool;

use crate::{
    db::{
        PgRentalRepository, PgReportRepository, PgUserRepository, PgVehicleRepository,
        RentalRepository, ReportRepository, UserRepository, VehicleRepository,
    },
    services::{
        auth::{AuthService, SessionKeys},
        catalog_service::CatalogService,
        rental_service::RentalService,
        report_service::ReportService,
        user_service::UserService,
        vehicle_service::VehicleService,
    },
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_SESSION_TTL_HOURS: i64 = 12;

/// Configurações do processo, lidas uma vez na inicialização.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub session_ttl: chrono::Duration,
}

impl AppConfig {
    /// Lê o ambiente, depois de carregar o `.env` se existir.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET must be set")?;
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {raw:?}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let ttl_hours: i64 = match lookup("SESSION_TTL_HOURS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("SESSION_TTL_HOURS is not a number: {raw:?}"))?,
            None => DEFAULT_SESSION_TTL_HOURS,
        };
        anyhow::ensure!(ttl_hours > 0, "SESSION_TTL_HOURS must be positive");
        let session_ttl =
            chrono::Duration::try_hours(ttl_hours).context("SESSION_TTL_HOURS is too large")?;

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            max_connections,
            session_ttl,
        })
    }

    pub fn session_keys(&self) -> SessionKeys {
        SessionKeys::new(self.jwt_secret.clone(), self.session_ttl)
    }
}

/// Os repositórios sobre os quais os serviços são montados.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub vehicles: Arc<dyn VehicleRepository>,
    pub rentals: Arc<dyn RentalRepository>,
    pub reports: Arc<dyn ReportRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            vehicles: Arc::new(PgVehicleRepository::new(pool.clone())),
            rentals: Arc::new(PgRentalRepository::new(pool.clone())),
            reports: Arc::new(PgReportRepository::new(pool)),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub rental_service: RentalService,
    pub user_service: UserService,
    pub vehicle_service: VehicleService,
    pub report_service: ReportService,
}

impl AppState {
    pub fn new(repositories: Repositories, keys: SessionKeys) -> Self {
        Self {
            auth_service: AuthService::new(repositories.users.clone(), keys),
            catalog_service: CatalogService::new(repositories.vehicles.clone()),
            rental_service: RentalService::new(repositories.rentals),
            user_service: UserService::new(repositories.users),
            vehicle_service: VehicleService::new(repositories.vehicles),
            report_service: ReportService::new(repositories.reports),
        }
    }
}
