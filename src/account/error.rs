//! Account error types

use thiserror::Error;

/// Failure reported by the storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    /// A write hit a unique column; carries the column name (`number` or `agency`)
    #[error("Duplicate value for unique column {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                let constraint = db.constraint().unwrap_or_default();
                for column in ["number", "agency"] {
                    if constraint.contains(column) {
                        return StorageError::Duplicate(column.to_string());
                    }
                }
            }
        }
        StorageError::Database(err)
    }
}

/// Errors raised by the account service
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Account {0} not found")]
    NotFound(i64),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Storage unavailable: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for AccountError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Duplicate(column) if column == "agency" => {
                AccountError::conflict("This agency number already exists.")
            }
            StorageError::Duplicate(_) => {
                AccountError::conflict("This account number already exists.")
            }
            other => AccountError::Storage(other),
        }
    }
}

impl AccountError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            AccountError::NotFound(_) => "ACCOUNT_NOT_FOUND",
            AccountError::Validation(_) => "VALIDATION_FAILED",
            AccountError::Conflict(_) => "CONFLICT",
            AccountError::Storage(_) => "STORAGE_ERROR",
        }
    }
}
