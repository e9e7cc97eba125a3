pub mod audit_logs;
pub mod common;
pub mod inventory;
pub mod notifications;
pub mod payments;
pub mod purchase_orders;
pub mod suppliers;
pub mod users;
