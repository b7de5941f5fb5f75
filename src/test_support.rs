// src/test_support.rs
//
// Substitutos em memória dos repositórios Postgres. Um único store implementa
// todos os traits, então serviços que o compartilham veem as escritas uns dos outros.

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    config::{AppState, Repositories},
    db::{RentalRepository, ReportRepository, UserRepository, VehicleRepository},
    models::{
        auth::{NewUser, Role, RoleName, User, UserChanges, UserCredentials, UserSummary},
        rental::{
            ActiveRental, ClosedRental, Payment, PaymentHistoryEntry, Rental, RentalPlan,
            RentalStatus, PAYMENT_MODE_CASH,
        },
        report::{RecentRental, ReportSummary, ReportTotals},
        vehicle::{Vehicle, VehicleDraft, VehicleFilter, VehicleStatus},
    },
    services::auth::SessionKeys,
};

pub const TEST_SECRET: &str = "test-secret";

#[derive(Default)]
struct Tables {
    roles: Vec<Role>,
    users: Vec<User>,
    vehicles: Vec<Vehicle>,
    rentals: Vec<Rental>,
    payments: Vec<Payment>,
}

fn next_id<T>(rows: &[T], id: impl Fn(&T) -> i32) -> i32 {
    rows.iter().map(id).max().unwrap_or(0) + 1
}

fn fk_violation(table: &str) -> AppError {
    AppError::InternalServerError(anyhow!("foreign key violation: rows in '{table}' still reference this row"))
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Cargos 1 Admin, 2 Staff, 3 Customer. O resto vazio.
    pub fn seeded() -> Arc<Self> {
        let store = Self::default();
        store.lock().roles = [(1, "Admin"), (2, "Staff"), (3, "Customer")]
            .into_iter()
            .map(|(id, name)| Role { id, name: name.to_string() })
            .collect();
        Arc::new(store)
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    pub fn user(&self, id: i32) -> Option<User> {
        self.lock().users.iter().find(|u| u.id == id).cloned()
    }

    pub fn vehicle(&self, id: i32) -> Option<Vehicle> {
        self.lock().vehicles.iter().find(|v| v.id == id).cloned()
    }

    pub fn rentals(&self) -> Vec<Rental> {
        self.lock().rentals.clone()
    }

    pub fn payments(&self) -> Vec<Payment> {
        self.lock().payments.clone()
    }

    pub fn remove_role(&self, name: &str) {
        self.lock().roles.retain(|r| r.name != name);
    }

    pub fn rename_role(&self, id: i32, name: &str) {
        if let Some(role) = self.lock().roles.iter_mut().find(|r| r.id == id) {
            role.name = name.to_string();
        }
    }

    /// Conta Customer com senha `pw`.
    pub fn insert_user(&self, name: &str, email: &str) -> i32 {
        self.insert_user_with_role(name, email, RoleName::Customer)
    }

    pub fn insert_user_with_role(&self, name: &str, email: &str, role: RoleName) -> i32 {
        let mut tables = self.lock();
        let role_id = match role {
            RoleName::Admin => 1,
            RoleName::Staff => 2,
            RoleName::Customer => 3,
        };
        let id = next_id(&tables.users, |u| u.id);
        tables.users.push(User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            phone: String::new(),
            password: "pw".to_string(),
            role_id,
        });
        id
    }

    pub fn insert_vehicle(
        &self,
        vehicle_type: &str,
        model: &str,
        rental_price: Decimal,
        status: VehicleStatus,
    ) -> i32 {
        let mut tables = self.lock();
        let id = next_id(&tables.vehicles, |v| v.id);
        tables.vehicles.push(Vehicle {
            id,
            vehicle_type: vehicle_type.to_string(),
            model: model.to_string(),
            registration_number: format!("REG-{id}"),
            rental_price,
            status,
        });
        id
    }

    fn insert_rental(&self, user_id: i32, vehicle_id: i32) {
        let mut tables = self.lock();
        let id = next_id(&tables.rentals, |r| r.id);
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();
        tables.rentals.push(Rental {
            id,
            user_id,
            vehicle_id,
            rental_date: day,
            return_date: day,
            total_amount: Decimal::ZERO,
            status: RentalStatus::Completed,
        });
    }

    /// Histórico apontando para o usuário, então a exclusão é recusada.
    pub fn insert_rental_for(&self, user_id: i32) {
        self.insert_rental(user_id, 0);
    }

    /// Histórico apontando para o veículo, então a exclusão é recusada.
    pub fn insert_rental_on(&self, vehicle_id: i32) {
        self.insert_rental(0, vehicle_id);
    }
}

/// Estado da aplicação ligado a um único store em memória.
pub fn test_state(store: &Arc<InMemoryStore>) -> AppState {
    AppState::new(
        Repositories {
            users: store.clone(),
            vehicles: store.clone(),
            rentals: store.clone(),
            reports: store.clone(),
        },
        SessionKeys::new(TEST_SECRET, Duration::hours(1)),
    )
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let tables = self.lock();
        Ok(tables.users.iter().find(|u| u.email == email).map(|u| UserCredentials {
            id: u.id,
            name: u.name.clone(),
            password: u.password.clone(),
            role_name: tables
                .roles
                .iter()
                .find(|r| r.id == u.role_id)
                .map(|r| r.name.clone()),
        }))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        Ok(self.user(id))
    }

    async fn find_role_id(&self, role: RoleName) -> Result<Option<i32>, AppError> {
        Ok(self
            .lock()
            .roles
            .iter()
            .find(|r| r.name == role.as_str())
            .map(|r| r.id))
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<User, AppError> {
        let mut tables = self.lock();
        if !tables.roles.iter().any(|r| r.id == new_user.role_id) {
            return Err(AppError::UnknownRole(new_user.role_id));
        }
        if tables.users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::EmailAlreadyExists);
        }
        let user = User {
            id: next_id(&tables.users, |u| u.id),
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            phone: new_user.phone.clone(),
            password: new_user.password.clone(),
            role_id: new_user.role_id,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: i32, changes: &UserChanges) -> Result<bool, AppError> {
        let mut tables = self.lock();
        if !tables.users.iter().any(|u| u.id == id) {
            return Ok(false);
        }
        if tables.users.iter().any(|u| u.id != id && u.email == changes.email) {
            return Err(AppError::EmailAlreadyExists);
        }
        if let Some(role_id) = changes.role_id
            && !tables.roles.iter().any(|r| r.id == role_id)
        {
            return Err(AppError::UnknownRole(role_id));
        }
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        user.name = changes.name.clone();
        user.email = changes.email.clone();
        user.phone = changes.phone.clone();
        if let Some(password) = &changes.password {
            user.password = password.clone();
        }
        if let Some(role_id) = changes.role_id {
            user.role_id = role_id;
        }
        Ok(true)
    }

    async fn set_role(&self, id: i32, role_id: i32) -> Result<bool, AppError> {
        let mut tables = self.lock();
        let role_exists = tables.roles.iter().any(|r| r.id == role_id);
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        if !role_exists {
            return Err(AppError::UnknownRole(role_id));
        }
        user.role_id = role_id;
        Ok(true)
    }

    async fn delete_user(&self, id: i32) -> Result<bool, AppError> {
        let mut tables = self.lock();
        if tables.rentals.iter().any(|r| r.user_id == id) {
            return Err(fk_violation("rentals"));
        }
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        Ok(tables.users.len() < before)
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, AppError> {
        let tables = self.lock();
        let mut users: Vec<UserSummary> = tables
            .users
            .iter()
            .map(|u| UserSummary {
                id: u.id,
                name: u.name.clone(),
                email: u.email.clone(),
                role_id: u.role_id,
                role_name: tables
                    .roles
                    .iter()
                    .find(|r| r.id == u.role_id)
                    .map(|r| r.name.clone()),
            })
            .collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        let mut roles = self.lock().roles.clone();
        roles.sort_by_key(|r| r.id);
        Ok(roles)
    }
}

#[async_trait]
impl VehicleRepository for InMemoryStore {
    async fn search(&self, filter: &VehicleFilter) -> Result<Vec<Vehicle>, AppError> {
        let mut vehicles: Vec<Vehicle> = self
            .lock()
            .vehicles
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect();
        vehicles.sort_by_key(|v| v.id);
        Ok(vehicles)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Vehicle>, AppError> {
        Ok(self.vehicle(id))
    }

    async fn create(&self, draft: &VehicleDraft) -> Result<Vehicle, AppError> {
        let mut tables = self.lock();
        if tables
            .vehicles
            .iter()
            .any(|v| v.registration_number == draft.registration_number)
        {
            return Err(AppError::RegistrationNumberAlreadyExists);
        }
        let vehicle = Vehicle {
            id: next_id(&tables.vehicles, |v| v.id),
            vehicle_type: draft.vehicle_type.clone(),
            model: draft.model.clone(),
            registration_number: draft.registration_number.clone(),
            rental_price: draft.rental_price,
            status: draft.status,
        };
        tables.vehicles.push(vehicle.clone());
        Ok(vehicle)
    }

    async fn update(&self, id: i32, draft: &VehicleDraft) -> Result<Option<Vehicle>, AppError> {
        let mut tables = self.lock();
        if tables
            .vehicles
            .iter()
            .any(|v| v.id != id && v.registration_number == draft.registration_number)
        {
            return Err(AppError::RegistrationNumberAlreadyExists);
        }
        let Some(vehicle) = tables.vehicles.iter_mut().find(|v| v.id == id) else {
            return Ok(None);
        };
        vehicle.vehicle_type = draft.vehicle_type.clone();
        vehicle.model = draft.model.clone();
        vehicle.registration_number = draft.registration_number.clone();
        vehicle.rental_price = draft.rental_price;
        vehicle.status = draft.status;
        Ok(Some(vehicle.clone()))
    }

    async fn set_status(&self, id: i32, status: VehicleStatus) -> Result<bool, AppError> {
        let mut tables = self.lock();
        let Some(vehicle) = tables.vehicles.iter_mut().find(|v| v.id == id) else {
            return Ok(false);
        };
        vehicle.status = status;
        Ok(true)
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let mut tables = self.lock();
        if tables.rentals.iter().any(|r| r.vehicle_id == id) {
            return Err(fk_violation("rentals"));
        }
        let before = tables.vehicles.len();
        tables.vehicles.retain(|v| v.id != id);
        Ok(tables.vehicles.len() < before)
    }
}

#[async_trait]
impl RentalRepository for InMemoryStore {
    async fn open_rental(
        &self,
        user_id: i32,
        vehicle_id: i32,
        plan: &RentalPlan,
    ) -> Result<Option<Rental>, AppError> {
        let mut tables = self.lock();
        let Some(vehicle) = tables
            .vehicles
            .iter_mut()
            .find(|v| v.id == vehicle_id && v.status == VehicleStatus::Available)
        else {
            return Ok(None);
        };
        let total_amount = plan
            .total_for(vehicle.rental_price)
            .ok_or(AppError::RentalDaysOutOfRange(plan.days))?;
        vehicle.status = VehicleStatus::Rented;

        let rental = Rental {
            id: next_id(&tables.rentals, |r| r.id),
            user_id,
            vehicle_id,
            rental_date: plan.rental_date,
            return_date: plan.return_date,
            total_amount,
            status: RentalStatus::Active,
        };
        tables.rentals.push(rental.clone());
        Ok(Some(rental))
    }

    async fn close_rental(
        &self,
        rental_id: i32,
        user_id: i32,
        returned_on: NaiveDate,
    ) -> Result<Option<ClosedRental>, AppError> {
        let mut tables = self.lock();
        let Some(rental) = tables.rentals.iter_mut().find(|r| {
            r.id == rental_id && r.user_id == user_id && r.status == RentalStatus::Active
        }) else {
            return Ok(None);
        };
        rental.status = RentalStatus::Completed;
        rental.return_date = returned_on;
        let rental = rental.clone();

        let payment = Payment {
            id: next_id(&tables.payments, |p| p.id),
            rental_id,
            payment_date: returned_on,
            amount: rental.total_amount,
            payment_mode: PAYMENT_MODE_CASH.to_string(),
        };
        tables.payments.push(payment.clone());

        if let Some(vehicle) = tables.vehicles.iter_mut().find(|v| v.id == rental.vehicle_id) {
            vehicle.status = VehicleStatus::Available;
        }
        Ok(Some(ClosedRental { rental, payment }))
    }

    async fn active_rentals_for_user(&self, user_id: i32) -> Result<Vec<ActiveRental>, AppError> {
        let tables = self.lock();
        Ok(tables
            .rentals
            .iter()
            .filter(|r| r.user_id == user_id && r.status == RentalStatus::Active)
            .filter_map(|r| {
                let vehicle = tables.vehicles.iter().find(|v| v.id == r.vehicle_id)?;
                Some(ActiveRental {
                    rental_id: r.id,
                    model: vehicle.model.clone(),
                    vehicle_type: vehicle.vehicle_type.clone(),
                    rental_date: r.rental_date,
                    return_date: r.return_date,
                    status: r.status,
                    total_amount: r.total_amount,
                })
            })
            .collect())
    }

    async fn payments_for_user(&self, user_id: i32) -> Result<Vec<PaymentHistoryEntry>, AppError> {
        let tables = self.lock();
        let mut history: Vec<PaymentHistoryEntry> = tables
            .payments
            .iter()
            .filter_map(|p| {
                let rental = tables
                    .rentals
                    .iter()
                    .find(|r| r.id == p.rental_id && r.user_id == user_id)?;
                let vehicle = tables.vehicles.iter().find(|v| v.id == rental.vehicle_id)?;
                Some(PaymentHistoryEntry {
                    payment_id: p.id,
                    payment_date: p.payment_date,
                    amount: p.amount,
                    payment_mode: p.payment_mode.clone(),
                    rental_id: rental.id,
                    model: vehicle.model.clone(),
                    vehicle_type: vehicle.vehicle_type.clone(),
                })
            })
            .collect();
        history.sort_by(|a, b| (b.payment_date, b.payment_id).cmp(&(a.payment_date, a.payment_id)));
        Ok(history)
    }
}

#[async_trait]
impl ReportRepository for InMemoryStore {
    async fn summary(&self, recent_limit: i64) -> Result<ReportSummary, AppError> {
        let tables = self.lock();
        let limit = usize::try_from(recent_limit).unwrap_or(0);

        let totals = ReportTotals {
            total_users: tables.users.len() as i64,
            total_vehicles: tables.vehicles.len() as i64,
            total_rentals: tables.rentals.len() as i64,
            total_revenue: tables.payments.iter().map(|p| p.amount).sum(),
        };

        let mut recent_rentals: Vec<RecentRental> = tables
            .rentals
            .iter()
            .filter_map(|r| {
                let user = tables.users.iter().find(|u| u.id == r.user_id)?;
                let vehicle = tables.vehicles.iter().find(|v| v.id == r.vehicle_id)?;
                Some(RecentRental {
                    rental_id: r.id,
                    customer: user.name.clone(),
                    model: vehicle.model.clone(),
                    rental_date: r.rental_date,
                    return_date: r.return_date,
                    status: r.status,
                    total_amount: r.total_amount,
                })
            })
            .collect();
        recent_rentals.sort_by(|a, b| (b.rental_date, b.rental_id).cmp(&(a.rental_date, a.rental_id)));
        recent_rentals.truncate(limit);

        let mut recent_payments = tables.payments.clone();
        recent_payments.sort_by(|a, b| (b.payment_date, b.id).cmp(&(a.payment_date, a.id)));
        recent_payments.truncate(limit);

        Ok(ReportSummary {
            totals,
            recent_rentals,
            recent_payments,
        })
    }
}
