//! HTTP handlers

pub mod accounts;
pub mod health;

pub use accounts::{create_account, delete_account, get_account, list_accounts, update_account};
pub use health::{HealthResponse, health_check};
