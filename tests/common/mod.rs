#![allow(dead_code)]

use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use ipms_api::{config::AppConfig, migrator::Migrator, AppState};

/// Fresh in-memory database with the full schema applied. A single
/// connection, so every query sees the same memory store.
pub async fn setup_db() -> Arc<DatabaseConnection> {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
    opt.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opt)
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    Arc::new(db)
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_key_that_is_definitely_longer_than_32_chars".to_string(),
        jwt_expiration: 3600,
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        log_level: "info".to_string(),
        log_json: false,
        auto_migrate: true,
        cors_allowed_origins: None,
        email_gateway_url: None,
        email_from: "noreply@test.local".to_string(),
        frontend_url: None,
        payment_link_base: "https://pay.example.com/pay".to_string(),
    }
}

pub async fn test_state() -> AppState {
    AppState::new(setup_db().await, test_config())
}
