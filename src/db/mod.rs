//! Database connection management

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::config::{DatabaseConfig, SeedAccountConfig};

/// Table definition for account storage
const CREATE_ACCOUNTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS accounts_tb (
    id      BIGSERIAL PRIMARY KEY,
    agency  BIGINT NOT NULL UNIQUE,
    number  BIGINT NOT NULL UNIQUE,
    balance NUMERIC(13, 2) NOT NULL
)
"#;

/// PostgreSQL database connection pool
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    pub async fn connect(database_url: &str, config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(database_url)
            .await?;

        tracing::info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Create `accounts_tb` if missing and make sure the protected account exists.
    ///
    /// The id sequence is moved past the highest stored id so server-assigned ids
    /// never collide with the seed row.
    pub async fn init_schema(&self, seed: &SeedAccountConfig) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(CREATE_ACCOUNTS_TABLE).execute(&mut *tx).await?;

        let inserted = sqlx::query(
            r#"INSERT INTO accounts_tb (id, agency, number, balance)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (id) DO NOTHING"#,
        )
        .bind(crate::account::PROTECTED_ACCOUNT_ID)
        .bind(seed.agency)
        .bind(seed.number)
        .bind(seed.balance)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query(
            r#"SELECT setval(pg_get_serial_sequence('accounts_tb', 'id'),
                             GREATEST((SELECT MAX(id) FROM accounts_tb), 1))"#,
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        if inserted > 0 {
            tracing::info!(
                id = crate::account::PROTECTED_ACCOUNT_ID,
                agency = seed.agency,
                number = seed.number,
                "Seeded protected account"
            );
        }
        tracing::info!("Account schema ready");
        Ok(())
    }
}
