use std::time::Duration;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;

pub mod user_repo;
pub use user_repo::{PgUserRepository, UserRepository};
pub mod vehicle_repo;
pub use vehicle_repo::{PgVehicleRepository, VehicleRepository};
pub mod rental_repo;
pub use rental_repo::{PgRentalRepository, RentalRepository};
pub mod report_repo;
pub use report_repo::{PgReportRepository, ReportRepository};
#[cfg(test)]
pub(crate) mod test_db;

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&config.database_url)
        .await
        .context("failed to connect to the database")?;

    tracing::info!("✅ Database connection established");
    Ok(pool)
}
