//! Account API - REST service for bank account records
//!
//! # Modules
//!
//! - [`account`] - Account models, storage backends and business rules
//! - [`gateway`] - HTTP router, handlers, error mapping, OpenAPI docs
//! - [`db`] - PostgreSQL pool and schema bootstrap
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing subscriber setup

pub mod account;
pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;

// Convenient re-exports at crate root
pub use account::{
    Account, AccountError, AccountPayload, AccountRepository, AccountService,
    InMemoryAccountRepository, PROTECTED_ACCOUNT_ID, PgAccountRepository,
};
pub use config::AppConfig;
pub use gateway::{create_router, run_server, state::AppState};
