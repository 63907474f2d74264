//! Repository layer for account storage

use async_trait::async_trait;
use sqlx::PgPool;

use super::error::StorageError;
use super::models::{Account, AccountDraft};

/// Storage contract for accounts.
///
/// Business rules and the protected account are enforced by
/// [`AccountService`](super::AccountService). Backends still refuse a write that
/// would duplicate a `number` or `agency`, returning [`StorageError::Duplicate`].
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// All stored accounts, ordered by id
    async fn find_all(&self) -> Result<Vec<Account>, StorageError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StorageError>;

    async fn exists_by_number(&self, number: i64) -> Result<bool, StorageError>;

    async fn exists_by_agency(&self, agency: i64) -> Result<bool, StorageError>;

    /// Insert when `account.id` is `None`, otherwise overwrite the record with that id.
    async fn save(&self, account: AccountDraft) -> Result<Account, StorageError>;

    async fn delete(&self, account: &Account) -> Result<(), StorageError>;

    /// Cheap liveness probe for health checks
    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// PostgreSQL-backed account repository (`accounts_tb`)
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn find_all(&self) -> Result<Vec<Account>, StorageError> {
        let rows: Vec<Account> =
            sqlx::query_as(r#"SELECT id, agency, number, balance FROM accounts_tb ORDER BY id"#)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StorageError> {
        let row: Option<Account> = sqlx::query_as(
            r#"SELECT id, agency, number, balance FROM accounts_tb WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn exists_by_number(&self, number: i64) -> Result<bool, StorageError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts_tb WHERE number = $1)",
        )
        .bind(number)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn exists_by_agency(&self, agency: i64) -> Result<bool, StorageError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts_tb WHERE agency = $1)",
        )
        .bind(agency)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn save(&self, account: AccountDraft) -> Result<Account, StorageError> {
        let saved: Account = match account.id {
            None => {
                sqlx::query_as(
                    r#"INSERT INTO accounts_tb (agency, number, balance)
                       VALUES ($1, $2, $3)
                       RETURNING id, agency, number, balance"#,
                )
                .bind(account.agency)
                .bind(account.number)
                .bind(account.balance)
                .fetch_one(&self.pool)
                .await?
            }
            Some(id) => {
                sqlx::query_as(
                    r#"INSERT INTO accounts_tb (id, agency, number, balance)
                       VALUES ($1, $2, $3, $4)
                       ON CONFLICT (id) DO UPDATE
                       SET agency = EXCLUDED.agency,
                           number = EXCLUDED.number,
                           balance = EXCLUDED.balance
                       RETURNING id, agency, number, balance"#,
                )
                .bind(id)
                .bind(account.agency)
                .bind(account.number)
                .bind(account.balance)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(saved)
    }

    async fn delete(&self, account: &Account) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM accounts_tb WHERE id = $1")
            .bind(account.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
