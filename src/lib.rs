//! Inventory and purchase management backend.
//!
//! A REST API over a stock ledger, purchase orders, suppliers, notifications,
//! audit logs and payment requests. State is threaded explicitly: `AppState`
//! carries the database handle, configuration, the auth service and one
//! service struct per domain.

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod migrator;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Json, Router};
use sea_orm::DatabaseConnection;

use auth::{AuthConfig, AuthService};
use config::AppConfig;
use services::{
    audit::AuditService, email::Mailer, inventory::InventoryService,
    notifications::NotificationService, payments::PaymentService,
    purchase_orders::PurchaseOrderService, suppliers::SupplierService, users::UserService,
};

/// One service struct per domain, all sharing the connection pool.
#[derive(Clone)]
pub struct AppServices {
    pub inventory: InventoryService,
    pub suppliers: SupplierService,
    pub orders: PurchaseOrderService,
    pub notifications: NotificationService,
    pub users: UserService,
    pub audit: AuditService,
    pub payments: PaymentService,
    pub mailer: Mailer,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
    pub auth: Arc<AuthService>,
    pub services: AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: AppConfig) -> Self {
        let config = Arc::new(config);
        let auth = Arc::new(AuthService::new(
            AuthConfig::new(
                config.jwt_secret.clone(),
                Duration::from_secs(config.jwt_expiration),
            ),
            Arc::clone(&db),
        ));
        let services = AppServices {
            inventory: InventoryService::new(Arc::clone(&db)),
            suppliers: SupplierService::new(Arc::clone(&db)),
            orders: PurchaseOrderService::new(Arc::clone(&db)),
            notifications: NotificationService::new(Arc::clone(&db)),
            users: UserService::new(Arc::clone(&db), Arc::clone(&auth)),
            audit: AuditService::new(Arc::clone(&db)),
            payments: PaymentService::new(Arc::clone(&db), config.payment_link_base.clone()),
            mailer: Mailer::new(config.email_gateway_url.clone(), config.email_from.clone()),
        };
        Self {
            db,
            config,
            auth,
            services,
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// The full application router, everything under `/api` plus `/health`.
pub fn api_routes() -> Router<AppState> {
    let api = Router::new()
        .nest("/auth", auth::auth_routes())
        .nest("/inventory", handlers::inventory::routes())
        .nest("/orders", handlers::purchase_orders::routes())
        .nest("/suppliers", handlers::suppliers::routes())
        .nest("/notifications", handlers::notifications::routes())
        .nest("/users", handlers::users::routes())
        .nest("/audit-logs", handlers::audit_logs::routes())
        .nest("/payments", handlers::payments::routes());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
}

pub fn app(state: AppState) -> Router {
    api_routes().with_state(state)
}
