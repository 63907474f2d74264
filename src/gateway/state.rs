use std::sync::Arc;

use crate::account::{AccountRepository, AccountService};

/// Gateway application state (shared)
#[derive(Clone)]
pub struct AppState {
    /// Account business rules over the configured storage backend
    pub accounts: Arc<AccountService>,
}

impl AppState {
    pub fn new(accounts: Arc<AccountService>) -> Self {
        Self { accounts }
    }

    /// Build the service on top of a storage backend
    pub fn with_repository(repo: Arc<dyn AccountRepository>) -> Self {
        Self::new(Arc::new(AccountService::new(repo)))
    }
}
