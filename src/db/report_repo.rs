// src/db/report_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::{
        rental::Payment,
        report::{RecentRental, ReportSummary, ReportTotals},
    },
};

#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Totais mais os `recent_limit` aluguéis e pagamentos mais recentes.
    async fn summary(&self, recent_limit: i64) -> Result<ReportSummary, AppError>;
}

#[derive(Clone)]
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn summary(&self, recent_limit: i64) -> Result<ReportSummary, AppError> {
        // REPEATABLE READ: as três leituras usam o mesmo snapshot.
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let totals = sqlx::query_as::<_, ReportTotals>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM vehicles) AS total_vehicles,
                (SELECT COUNT(*) FROM rentals) AS total_rentals,
                (SELECT COALESCE(SUM(amount), 0) FROM payments) AS total_revenue
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        let recent_rentals = sqlx::query_as::<_, RecentRental>(
            r#"
            SELECT r.id AS rental_id, u.name AS customer, v.model,
                   r.rental_date, r.return_date, r.status, r.total_amount
            FROM rentals r
            JOIN users u ON r.user_id = u.id
            JOIN vehicles v ON r.vehicle_id = v.id
            ORDER BY r.rental_date DESC, r.id DESC
            LIMIT $1
            "#,
        )
        .bind(recent_limit)
        .fetch_all(&mut *tx)
        .await?;

        let recent_payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, rental_id, payment_date, amount, payment_mode
            FROM payments
            ORDER BY payment_date DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(recent_limit)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ReportSummary {
            totals,
            recent_rentals,
            recent_payments,
        })
    }
}
