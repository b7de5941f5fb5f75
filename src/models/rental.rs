// src/models/rental.rs

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Todo pagamento registrado na devolução é em dinheiro.
pub const PAYMENT_MODE_CASH: &str = "Cash";

/// Maior valor que cabe em 'rentals.total_amount' (NUMERIC(12,2)).
// 9_999_999_999.99 (mantissa 999_999_999_999, scale 2); `Decimal::new` is not const.
pub const MAX_RENTAL_TOTAL: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "rental_status")]
pub enum RentalStatus {
    Active,
    Completed,
}

// Linha da tabela 'rentals'
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: i32,
    pub user_id: i32,
    pub vehicle_id: i32,
    pub rental_date: NaiveDate,
    pub return_date: NaiveDate,
    #[schema(value_type = f64)]
    pub total_amount: Decimal,
    pub status: RentalStatus,
}

// Linha da tabela 'payments'
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i32,
    pub rental_id: i32,
    pub payment_date: NaiveDate,
    #[schema(value_type = f64)]
    pub amount: Decimal,
    #[schema(example = "Cash")]
    pub payment_mode: String,
}

/// Aluguel concluído junto com o pagamento que gerou.
#[derive(Debug, Clone)]
pub struct ClosedRental {
    pub rental: Rental,
    pub payment: Payment,
}

/// Datas e duração de um aluguel prestes a ser aberto. O preço só é conhecido
/// depois de reservar o veículo, então o total é calculado depois.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalPlan {
    pub days: i64,
    pub rental_date: NaiveDate,
    pub return_date: NaiveDate,
}

impl RentalPlan {
    /// Sem duração vale um dia, e abaixo de um vira um.
    /// `None` quando a data de devolução sairia do calendário.
    pub fn new(days: Option<i64>, today: NaiveDate) -> Option<Self> {
        let days = days.unwrap_or(1).max(1);
        let return_date = today.checked_add_days(Days::new(u64::try_from(days).ok()?))?;
        Some(Self { days, rental_date: today, return_date })
    }

    /// `None` quando o total não cabe na coluna.
    pub fn total_for(&self, daily_price: Decimal) -> Option<Decimal> {
        daily_price
            .checked_mul(Decimal::from(self.days))
            .filter(|total| *total <= MAX_RENTAL_TOTAL)
    }
}

/// Formulário de aluguel. `days` aceita número ou string numérica. O resto
/// conta como ausente.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RentPayload {
    #[serde(default, deserialize_with = "lenient_days")]
    #[schema(value_type = Option<i64>, example = 3)]
    pub days: Option<i64>,
}

fn lenient_days<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Linha do painel do cliente: um aluguel aberto e o seu veículo.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveRental {
    pub rental_id: i32,
    pub model: String,
    pub vehicle_type: String,
    pub rental_date: NaiveDate,
    pub return_date: NaiveDate,
    pub status: RentalStatus,
    #[schema(value_type = f64)]
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentHistoryEntry {
    pub payment_id: i32,
    pub payment_date: NaiveDate,
    #[schema(value_type = f64)]
    pub amount: Decimal,
    pub payment_mode: String,
    pub rental_id: i32,
    pub model: String,
    pub vehicle_type: String,
}
