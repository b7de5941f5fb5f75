// src/db/rental_repo.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::rental::{
        ActiveRental, ClosedRental, Payment, PaymentHistoryEntry, Rental, RentalPlan,
        PAYMENT_MODE_CASH,
    },
};

const RENTAL_COLUMNS: &str =
    "id, user_id, vehicle_id, rental_date, return_date, total_amount, status";

#[async_trait]
pub trait RentalRepository: Send + Sync {
    /// Reserva um veículo Available e abre um aluguel Active, de forma atômica.
    /// `None` se o veículo não existe ou não está Available.
    async fn open_rental(
        &self,
        user_id: i32,
        vehicle_id: i32,
        plan: &RentalPlan,
    ) -> Result<Option<Rental>, AppError>;

    /// Conclui o aluguel Active do usuário, registra o pagamento em dinheiro e libera
    /// o veículo, de forma atômica. `None` se o aluguel não existe, é de
    /// outro usuário ou já foi concluído.
    async fn close_rental(
        &self,
        rental_id: i32,
        user_id: i32,
        returned_on: NaiveDate,
    ) -> Result<Option<ClosedRental>, AppError>;

    async fn active_rentals_for_user(&self, user_id: i32) -> Result<Vec<ActiveRental>, AppError>;

    async fn payments_for_user(&self, user_id: i32) -> Result<Vec<PaymentHistoryEntry>, AppError>;
}

#[derive(Clone)]
pub struct PgRentalRepository {
    pool: PgPool,
}

impl PgRentalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RentalRepository for PgRentalRepository {
    async fn open_rental(
        &self,
        user_id: i32,
        vehicle_id: i32,
        plan: &RentalPlan,
    ) -> Result<Option<Rental>, AppError> {
        let mut tx = self.pool.begin().await?;

        // A checagem de disponibilidade e a reserva são o mesmo comando, então dois
        // clientes não levam o mesmo veículo.
        let claimed_price = sqlx::query_scalar::<_, Decimal>(
            r#"
            UPDATE vehicles
            SET status = 'Rented'
            WHERE id = $1 AND status = 'Available'
            RETURNING rental_price
            "#,
        )
        .bind(vehicle_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(daily_price) = claimed_price else {
            return Ok(None);
        };
        // Sem commit a transação é desfeita e o veículo volta a 'Available'.
        let Some(total_amount) = plan.total_for(daily_price) else {
            tracing::warn!(vehicle_id, days = plan.days, "Rental total exceeds the amount column");
            return Err(AppError::RentalDaysOutOfRange(plan.days));
        };

        let rental = sqlx::query_as::<_, Rental>(&format!(
            r#"
            INSERT INTO rentals (user_id, vehicle_id, rental_date, return_date, total_amount, status)
            VALUES ($1, $2, $3, $4, $5, 'Active')
            RETURNING {RENTAL_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(vehicle_id)
        .bind(plan.rental_date)
        .bind(plan.return_date)
        .bind(total_amount)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(rental))
    }

    async fn close_rental(
        &self,
        rental_id: i32,
        user_id: i32,
        returned_on: NaiveDate,
    ) -> Result<Option<ClosedRental>, AppError> {
        let mut tx = self.pool.begin().await?;

        let completed = sqlx::query_as::<_, Rental>(&format!(
            r#"
            UPDATE rentals
            SET status = 'Completed', return_date = $3
            WHERE id = $1 AND user_id = $2 AND status = 'Active'
            RETURNING {RENTAL_COLUMNS}
            "#
        ))
        .bind(rental_id)
        .bind(user_id)
        .bind(returned_on)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(rental) = completed else {
            return Ok(None);
        };

        // O valor cobrado é o fixado na abertura do aluguel.
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (rental_id, payment_date, amount, payment_mode)
            VALUES ($1, $2, $3, $4)
            RETURNING id, rental_id, payment_date, amount, payment_mode
            "#,
        )
        .bind(rental.id)
        .bind(returned_on)
        .bind(rental.total_amount)
        .bind(PAYMENT_MODE_CASH)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE vehicles SET status = 'Available' WHERE id = $1")
            .bind(rental.vehicle_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(ClosedRental { rental, payment }))
    }

    async fn active_rentals_for_user(&self, user_id: i32) -> Result<Vec<ActiveRental>, AppError> {
        let rentals = sqlx::query_as::<_, ActiveRental>(
            r#"
            SELECT r.id AS rental_id, v.model, v.vehicle_type, r.rental_date,
                   r.return_date, r.status, r.total_amount
            FROM rentals r
            JOIN vehicles v ON r.vehicle_id = v.id
            WHERE r.user_id = $1 AND r.status = 'Active'
            ORDER BY r.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rentals)
    }

    async fn payments_for_user(&self, user_id: i32) -> Result<Vec<PaymentHistoryEntry>, AppError> {
        let payments = sqlx::query_as::<_, PaymentHistoryEntry>(
            r#"
            SELECT p.id AS payment_id, p.payment_date, p.amount, p.payment_mode,
                   r.id AS rental_id, v.model, v.vehicle_type
            FROM payments p
            JOIN rentals r ON p.rental_id = r.id
            JOIN vehicles v ON r.vehicle_id = v.id
            WHERE r.user_id = $1
            ORDER BY p.payment_date DESC, p.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(payments)
    }
}
