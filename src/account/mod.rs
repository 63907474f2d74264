//! Account management module
//!
//! Models, storage backends (PostgreSQL and in-memory) and the service that
//! enforces account business rules.

pub mod error;
pub mod memory;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{AccountError, StorageError};
pub use memory::InMemoryAccountRepository;
pub use models::{Account, AccountDraft, AccountPayload};
pub use repository::{AccountRepository, PgAccountRepository};
pub use service::{AccountService, PROTECTED_ACCOUNT_ID};

// Re-export Database from top-level db module
pub use crate::db::Database;
