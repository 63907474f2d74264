//! Account business rules
//!
//! Every mutation goes through [`AccountService`], which rejects writes to the
//! protected account and keeps `number` and `agency` unique before touching storage.

use rust_decimal::Decimal;
use std::sync::Arc;

use super::error::AccountError;
use super::models::{Account, AccountDraft, AccountPayload};
use super::repository::AccountRepository;

/// Id of the seed account that can never be created, updated or deleted via the API
pub const PROTECTED_ACCOUNT_ID: i64 = 1;

/// Balances are stored as `NUMERIC(13, 2)`
const BALANCE_SCALE: u32 = 2;
const BALANCE_INTEGER_DIGITS: u32 = 11;

pub struct AccountService {
    repo: Arc<dyn AccountRepository>,
}

impl AccountService {
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self {
        Self { repo }
    }

    /// Storage backend, for health checks
    pub fn repository(&self) -> &Arc<dyn AccountRepository> {
        &self.repo
    }

    pub async fn find_all(&self) -> Result<Vec<Account>, AccountError> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Account, AccountError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id))
    }

    /// Create a new account. Any client-supplied id other than the protected
    /// one is ignored; storage assigns the id.
    pub async fn create(&self, payload: Option<AccountPayload>) -> Result<Account, AccountError> {
        let payload =
            payload.ok_or_else(|| AccountError::validation("Account to create must not be null."))?;
        let (agency, number, balance) = required_fields(&payload)?;

        if let Some(id) = payload.id {
            validate_changeable_id(id, "created")?;
        }

        if self.repo.exists_by_number(number).await? {
            tracing::warn!(number, "Rejected create: duplicate account number");
            return Err(AccountError::conflict("This account number already exists."));
        }
        if self.repo.exists_by_agency(agency).await? {
            tracing::warn!(agency, "Rejected create: duplicate agency");
            return Err(AccountError::conflict("This agency number already exists."));
        }

        let account = self
            .repo
            .save(AccountDraft::new(agency, number, balance))
            .await?;

        tracing::info!(
            id = account.id,
            agency = account.agency,
            number = account.number,
            backend = self.repo.name(),
            "Account created"
        );
        Ok(account)
    }

    /// Replace agency, number and balance of an existing account. The id never changes.
    pub async fn update(&self, id: i64, payload: AccountPayload) -> Result<Account, AccountError> {
        validate_changeable_id(id, "updated")?;
        let existing = self.find_by_id(id).await?;

        if payload.id != Some(existing.id) {
            tracing::warn!(path_id = id, body_id = ?payload.id, "Rejected update: id mismatch");
            return Err(AccountError::validation("Update IDs must be the same."));
        }
        let (agency, number, balance) = required_fields(&payload)?;

        if number != existing.number && self.repo.exists_by_number(number).await? {
            tracing::warn!(id, number, "Rejected update: duplicate account number");
            return Err(AccountError::conflict("This account number already exists."));
        }
        if agency != existing.agency && self.repo.exists_by_agency(agency).await? {
            tracing::warn!(id, agency, "Rejected update: duplicate agency");
            return Err(AccountError::conflict("This agency number already exists."));
        }

        let mut draft = AccountDraft::from(existing);
        draft.agency = agency;
        draft.number = number;
        draft.balance = balance;

        let account = self.repo.save(draft).await?;
        tracing::info!(id = account.id, "Account updated");
        Ok(account)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AccountError> {
        validate_changeable_id(id, "deleted")?;
        let existing = self.find_by_id(id).await?;

        self.repo.delete(&existing).await?;
        tracing::info!(id, "Account deleted");
        Ok(())
    }
}

fn validate_changeable_id(id: i64, operation: &str) -> Result<(), AccountError> {
    if id == PROTECTED_ACCOUNT_ID {
        tracing::warn!(id, operation, "Rejected write to protected account");
        return Err(AccountError::conflict(format!(
            "Account with ID {} can not be {}.",
            PROTECTED_ACCOUNT_ID, operation
        )));
    }
    Ok(())
}

fn required_fields(payload: &AccountPayload) -> Result<(i64, i64, Decimal), AccountError> {
    let agency = payload
        .agency
        .ok_or_else(|| AccountError::validation("Account agency must not be null."))?;
    let number = payload
        .number
        .ok_or_else(|| AccountError::validation("Account number must not be null."))?;
    let balance = payload
        .balance
        .ok_or_else(|| AccountError::validation("Account balance must not be null."))?;
    validate_balance(balance)?;
    Ok((agency, number, balance))
}

fn validate_balance(balance: Decimal) -> Result<(), AccountError> {
    if balance.normalize().scale() > BALANCE_SCALE {
        return Err(AccountError::validation(format!(
            "Account balance must have at most {} decimal places.",
            BALANCE_SCALE
        )));
    }
    let limit = Decimal::from(10_i64.pow(BALANCE_INTEGER_DIGITS));
    if balance.abs() >= limit {
        return Err(AccountError::validation(format!(
            "Account balance must be less than {} in absolute value.",
            limit
        )));
    }
    Ok(())
}
