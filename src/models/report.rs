// src/models/report.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::rental::{Payment, RentalStatus};

// Contadores principais
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotals {
    pub total_users: i64,
    pub total_vehicles: i64,
    pub total_rentals: i64,
    #[schema(value_type = f64)]
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentRental {
    pub rental_id: i32,
    pub customer: String,
    pub model: String,
    pub rental_date: NaiveDate,
    pub return_date: NaiveDate,
    pub status: RentalStatus,
    #[schema(value_type = f64)]
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    #[serde(flatten)]
    pub totals: ReportTotals,
    pub recent_rentals: Vec<RecentRental>,
    pub recent_payments: Vec<Payment>,
}
