//! Account API server
//!
//! ```text
//! ┌──────────┐    ┌──────────────┐    ┌──────────────────────┐
//! │  Axum    │───▶│AccountService│───▶│ AccountRepository    │
//! │ Gateway  │    │ (rules)      │    │ (Postgres | memory)  │
//! └──────────┘    └──────────────┘    └──────────────────────┘
//! ```
//!
//! Usage: `account_api [--env dev] [--port 8080]`

use std::sync::Arc;

use account_api::account::{
    AccountRepository, Database, InMemoryAccountRepository, PgAccountRepository,
};
use account_api::config::AppConfig;
use account_api::gateway::state::AppState;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

/// Pick the storage backend: PostgreSQL when a URL is configured, memory otherwise
async fn build_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn AccountRepository>> {
    match &config.postgres_url {
        Some(url) => {
            let db = Database::connect(url, &config.database).await?;
            db.health_check().await?;
            db.init_schema(&config.seed_account).await?;
            Ok(Arc::new(PgAccountRepository::new(db.pool().clone())))
        }
        None => {
            tracing::warn!("No postgres_url configured, accounts are kept in memory");
            Ok(Arc::new(InMemoryAccountRepository::with_seed(
                &config.seed_account,
            )))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let app_config = AppConfig::load(&env)?;
    let _log_guard = account_api::logging::init_logging(&app_config);

    tracing::info!(
        "Starting Account API in {} mode (build {})",
        env,
        env!("GIT_HASH")
    );

    let repo = build_repository(&app_config).await?;
    tracing::info!("Account storage backend: {}", repo.name());

    let state = Arc::new(AppState::with_repository(repo));
    let addr = app_config.bind_addr(get_port_override());

    account_api::gateway::run_server(&addr, state).await
}
