// src/services/rental_service.rs

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::{
    common::error::AppError,
    db::RentalRepository,
    models::rental::{ActiveRental, ClosedRental, PaymentHistoryEntry, Rental, RentalPlan},
};

/// Aluguel e devolução. Cada transição é uma única chamada ao repositório,
/// com a sua própria transação.
#[derive(Clone)]
pub struct RentalService {
    rentals: Arc<dyn RentalRepository>,
}

impl RentalService {
    pub fn new(rentals: Arc<dyn RentalRepository>) -> Self {
        Self { rentals }
    }

    /// `Ok(None)` se o veículo não existe ou não está Available.
    pub async fn rent(
        &self,
        user_id: i32,
        vehicle_id: i32,
        days: Option<i64>,
    ) -> Result<Option<Rental>, AppError> {
        self.rent_on(user_id, vehicle_id, days, today()).await
    }

    pub(crate) async fn rent_on(
        &self,
        user_id: i32,
        vehicle_id: i32,
        days: Option<i64>,
        today: NaiveDate,
    ) -> Result<Option<Rental>, AppError> {
        let plan = RentalPlan::new(days, today)
            .ok_or(AppError::RentalDaysOutOfRange(days.unwrap_or_default()))?;

        let rental = self.rentals.open_rental(user_id, vehicle_id, &plan).await?;
        match &rental {
            Some(r) => tracing::info!(
                rental_id = r.id,
                user_id,
                vehicle_id,
                days = plan.days,
                total = %r.total_amount,
                "Vehicle rented"
            ),
            None => tracing::debug!(user_id, vehicle_id, "Vehicle not available for rent"),
        }
        Ok(rental)
    }

    /// `Ok(None)` se o aluguel não existe, é de outro usuário ou já foi
    /// concluído. Nesse caso nada muda.
    pub async fn return_rental(
        &self,
        user_id: i32,
        rental_id: i32,
    ) -> Result<Option<ClosedRental>, AppError> {
        self.return_on(user_id, rental_id, today()).await
    }

    pub(crate) async fn return_on(
        &self,
        user_id: i32,
        rental_id: i32,
        today: NaiveDate,
    ) -> Result<Option<ClosedRental>, AppError> {
        let closed = self.rentals.close_rental(rental_id, user_id, today).await?;
        match &closed {
            Some(c) => tracing::info!(
                rental_id,
                user_id,
                payment_id = c.payment.id,
                amount = %c.payment.amount,
                "Rental returned"
            ),
            None => tracing::debug!(rental_id, user_id, "Nothing to return"),
        }
        Ok(closed)
    }

    pub async fn active_rentals(&self, user_id: i32) -> Result<Vec<ActiveRental>, AppError> {
        self.rentals.active_rentals_for_user(user_id).await
    }

    /// Mais recentes primeiro.
    pub async fn payment_history(&self, user_id: i32) -> Result<Vec<PaymentHistoryEntry>, AppError> {
        self.rentals.payments_for_user(user_id).await
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        rental::{RentalStatus, PAYMENT_MODE_CASH},
        vehicle::VehicleStatus,
    };
    use crate::test_support::InMemoryStore;
    use rust_decimal::Decimal;

    const CUSTOMER: i32 = 7;
    const OTHER_CUSTOMER: i32 = 8;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn setup() -> (Arc<InMemoryStore>, RentalService, i32) {
        let store = InMemoryStore::seeded();
        let vehicle_id =
            store.insert_vehicle("Sedan", "Corolla", Decimal::from(20), VehicleStatus::Available);
        let service = RentalService::new(store.clone());
        (store, service, vehicle_id)
    }

    #[tokio::test]
    async fn rent_then_return_round_trip() {
        let (store, service, vehicle_id) = setup();

        let rental = service
            .rent_on(CUSTOMER, vehicle_id, Some(3), day(1))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(rental.total_amount, Decimal::from(60));
        assert_eq!(rental.status, RentalStatus::Active);
        assert_eq!(rental.return_date, day(4));
        assert_eq!(store.vehicle(vehicle_id).unwrap().status, VehicleStatus::Rented);

        let closed = service
            .return_on(CUSTOMER, rental.id, day(2))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(closed.rental.status, RentalStatus::Completed);
        assert_eq!(closed.rental.return_date, day(2));
        assert_eq!(closed.rental.total_amount, Decimal::from(60));
        assert_eq!(closed.payment.amount, Decimal::from(60));
        assert_eq!(closed.payment.payment_mode, PAYMENT_MODE_CASH);
        assert_eq!(closed.payment.payment_date, day(2));
        assert_eq!(store.payments().len(), 1);
        assert_eq!(store.vehicle(vehicle_id).unwrap().status, VehicleStatus::Available);
    }

    #[tokio::test]
    async fn missing_days_rent_for_one_day() {
        let (_, service, vehicle_id) = setup();

        let rental = service
            .rent_on(CUSTOMER, vehicle_id, None, day(1))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(rental.total_amount, Decimal::from(20));
        assert_eq!(rental.return_date, day(2));
    }

    #[tokio::test]
    async fn only_available_vehicles_can_be_rented() {
        let (store, service, vehicle_id) = setup();
        let in_shop =
            store.insert_vehicle("Van", "Transit", Decimal::from(50), VehicleStatus::Maintenance);

        assert!(service.rent_on(CUSTOMER, vehicle_id, Some(2), day(1)).await.unwrap().is_some());
        assert!(service.rent_on(OTHER_CUSTOMER, vehicle_id, Some(2), day(1)).await.unwrap().is_none());
        assert!(service.rent_on(CUSTOMER, in_shop, Some(2), day(1)).await.unwrap().is_none());
        assert!(service.rent_on(CUSTOMER, 404, Some(2), day(1)).await.unwrap().is_none());
        assert_eq!(store.rentals().len(), 1);
    }

    #[tokio::test]
    async fn foreign_or_completed_rentals_are_left_alone() {
        let (store, service, vehicle_id) = setup();
        let rental = service
            .rent_on(CUSTOMER, vehicle_id, Some(1), day(1))
            .await
            .unwrap()
            .unwrap();

        assert!(service.return_on(OTHER_CUSTOMER, rental.id, day(2)).await.unwrap().is_none());
        assert_eq!(store.vehicle(vehicle_id).unwrap().status, VehicleStatus::Rented);
        assert!(store.payments().is_empty());

        service.return_on(CUSTOMER, rental.id, day(2)).await.unwrap().unwrap();
        assert!(service.return_on(CUSTOMER, rental.id, day(3)).await.unwrap().is_none());
        assert_eq!(store.payments().len(), 1);
        assert_eq!(store.rentals()[0].return_date, day(2));
    }

    #[tokio::test]
    async fn dashboard_and_history_are_per_customer() {
        let (store, service, vehicle_id) = setup();
        let second =
            store.insert_vehicle("SUV", "Duster", Decimal::from(45), VehicleStatus::Available);

        let first = service.rent_on(CUSTOMER, vehicle_id, Some(1), day(1)).await.unwrap().unwrap();
        service.rent_on(OTHER_CUSTOMER, second, Some(1), day(1)).await.unwrap().unwrap();

        let active = service.active_rentals(CUSTOMER).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].model, "Corolla");

        service.return_on(CUSTOMER, first.id, day(2)).await.unwrap().unwrap();

        assert!(service.active_rentals(CUSTOMER).await.unwrap().is_empty());
        let history = service.payment_history(CUSTOMER).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].rental_id, first.id);
        assert_eq!(history[0].vehicle_type, "Sedan");
        assert!(service.payment_history(OTHER_CUSTOMER).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rental_lengths_past_the_calendar_are_rejected() {
        let (store, service, vehicle_id) = setup();

        let err = service
            .rent_on(CUSTOMER, vehicle_id, Some(i64::MAX), day(1))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RentalDaysOutOfRange(_)));
        assert_eq!(store.vehicle(vehicle_id).unwrap().status, VehicleStatus::Available);
    }

    #[tokio::test]
    async fn totals_too_large_to_store_are_rejected_and_the_vehicle_stays_free() {
        let store = InMemoryStore::seeded();
        let vehicle_id =
            store.insert_vehicle("Truck", "Actros", Decimal::from(200), VehicleStatus::Available);
        let service = RentalService::new(store.clone());

        let err = service
            .rent_on(CUSTOMER, vehicle_id, Some(90_000_000), day(1))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RentalDaysOutOfRange(90_000_000)));
        assert_eq!(store.vehicle(vehicle_id).unwrap().status, VehicleStatus::Available);
        assert!(store.rentals().is_empty());
    }
}
