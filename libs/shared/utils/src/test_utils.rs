use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use shared_config::AppConfig;
use shared_database::{init_schema, AppState};

use crate::jwt::sign_token;

pub struct TestConfig {
    pub jwt_secret: String,
    pub stripe_api_base_url: String,
    pub mail_relay_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            stripe_api_base_url: "http://localhost:12111".to_string(),
            mail_relay_url: String::new(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: self.jwt_secret.clone(),
            stripe_secret_key: "sk_test_123".to_string(),
            stripe_api_base_url: self.stripe_api_base_url.clone(),
            mail_relay_url: self.mail_relay_url.clone(),
            mail_from: "noreply@dnh.dental".to_string(),
            mail_admin_address: "admin@dnh.dental".to_string(),
            upload_dir: std::env::temp_dir().display().to_string(),
            public_base_url: "http://localhost:3000".to_string(),
            port: 0,
        }
    }
}

/// Fresh in-memory database with the full schema applied. A single
/// connection keeps every handle on the same memory store.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite should open");
    init_schema(&pool).await.expect("schema should apply");
    pool
}

pub async fn test_state(config: TestConfig) -> Arc<AppState> {
    let pool = memory_pool().await;
    Arc::new(AppState::new(config.to_app_config(), pool))
}

pub fn mint_token(user_id: &str, email: &str, role: &str, jwt_secret: &str) -> String {
    sign_token(user_id, Some(email), Some(role), jwt_secret).expect("token should sign")
}

/// Insert a booking row directly, bypassing the lifecycle service. Returns
/// the new row id.
pub async fn seed_booking(
    pool: &SqlitePool,
    date: NaiveDate,
    time: NaiveTime,
    payment_status: &str,
    status: &str,
    created_at: DateTime<Utc>,
) -> i64 {
    let result = sqlx::query(
        "INSERT INTO bookings \
         (dentist_name, email, phone, date, time, payment_status, status, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind("Dr. Seed")
    .bind("seed@example.com")
    .bind("07000000000")
    .bind(date)
    .bind(time)
    .bind(payment_status)
    .bind(status)
    .bind(created_at)
    .bind(created_at)
    .execute(pool)
    .await
    .expect("seed booking should insert");
    result.last_insert_rowid()
}
