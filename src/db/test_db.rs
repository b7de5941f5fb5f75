// src/db/test_db.rs
//
// Banco descartável para os testes dos repositórios Postgres. Cada teste
// cria o seu a partir de DATABASE_URL; sem a variável o teste é pulado.

use std::{
    str::FromStr,
    sync::atomic::{AtomicU32, Ordering},
};

use rust_decimal::Decimal;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    Connection, PgConnection, PgPool,
};

static NEXT_DATABASE: AtomicU32 = AtomicU32::new(0);

pub struct TestDatabase {
    pub pool: PgPool,
    server: PgConnectOptions,
    name: String,
}

impl TestDatabase {
    /// `None` quando DATABASE_URL não está definida. Falhas de setup com a
    /// variável presente derrubam o teste.
    pub async fn create() -> Option<Self> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("SKIP-TEST-DATABASE: set DATABASE_URL to run the Postgres repository tests");
            return None;
        };

        let server = PgConnectOptions::from_str(&url).expect("DATABASE_URL should parse");
        let name = format!(
            "vehicle_rental_test_{}_{}",
            std::process::id(),
            NEXT_DATABASE.fetch_add(1, Ordering::Relaxed)
        );

        let mut admin = PgConnection::connect_with(&server)
            .await
            .expect("server from DATABASE_URL should accept connections");
        sqlx::query(&format!(r#"CREATE DATABASE "{name}""#))
            .execute(&mut admin)
            .await
            .expect("test database should be created");
        admin.close().await.ok();

        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect_with(server.clone().database(&name))
            .await
            .expect("test database should accept connections");
        sqlx::migrate!()
            .run(&pool)
            .await
            .expect("migrations should apply to a fresh database");

        Some(Self { pool, server, name })
    }

    pub async fn insert_user(&self, name: &str, email: &str) -> i32 {
        sqlx::query_scalar(
            "INSERT INTO users (name, email, password, role_id) VALUES ($1, $2, 'pw', 3) RETURNING id",
        )
        .bind(name)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .expect("user insert")
    }

    pub async fn insert_vehicle(&self, vehicle_type: &str, model: &str, price: Decimal) -> i32 {
        sqlx::query_scalar(
            r#"
            INSERT INTO vehicles (vehicle_type, model, registration_number, rental_price)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(vehicle_type)
        .bind(model)
        .bind(format!("{vehicle_type}-{model}"))
        .bind(price)
        .fetch_one(&self.pool)
        .await
        .expect("vehicle insert")
    }

    pub async fn vehicle_status(&self, vehicle_id: i32) -> String {
        sqlx::query_scalar("SELECT status::text FROM vehicles WHERE id = $1")
            .bind(vehicle_id)
            .fetch_one(&self.pool)
            .await
            .expect("vehicle lookup")
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("row count")
    }

    pub async fn cleanup(self) {
        self.pool.close().await;
        let mut admin = PgConnection::connect_with(&self.server)
            .await
            .expect("server should still accept connections");
        sqlx::query(&format!(r#"DROP DATABASE IF EXISTS "{}" WITH (FORCE)"#, self.name))
            .execute(&mut admin)
            .await
            .expect("test database should be dropped");
        admin.close().await.ok();
    }
}
