pub mod audit_log;
pub mod inventory_item;
pub mod notification;
pub mod payment_request;
pub mod payment_transaction;
pub mod purchase_order;
pub mod supplier;
pub mod user;
