//! Data models for bank account records

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Stored account. Every field is present once persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Account {
    /// Server-assigned identifier
    #[schema(example = 2)]
    pub id: i64,
    /// Branch code, unique across accounts
    #[schema(example = 10)]
    pub agency: i64,
    /// Account code, unique across accounts
    #[schema(example = 555)]
    pub number: i64,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 100.0)]
    pub balance: Decimal,
}

/// Account handed to the storage layer. `id == None` means insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDraft {
    pub id: Option<i64>,
    pub agency: i64,
    pub number: i64,
    pub balance: Decimal,
}

impl AccountDraft {
    pub fn new(agency: i64, number: i64, balance: Decimal) -> Self {
        Self {
            id: None,
            agency,
            number,
            balance,
        }
    }

    /// Attach the id assigned by storage
    pub fn into_account(self, id: i64) -> Account {
        Account {
            id,
            agency: self.agency,
            number: self.number,
            balance: self.balance,
        }
    }
}

impl From<Account> for AccountDraft {
    fn from(account: Account) -> Self {
        Self {
            id: Some(account.id),
            agency: account.agency,
            number: account.number,
            balance: account.balance,
        }
    }
}

/// Account representation as received over HTTP.
///
/// All fields are optional so missing values surface as validation errors
/// from the service instead of deserialization failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccountPayload {
    /// Ignored on create; must match the path id on update
    #[serde(default)]
    #[schema(example = 2)]
    pub id: Option<i64>,
    #[serde(default)]
    #[schema(example = 10)]
    pub agency: Option<i64>,
    #[serde(default)]
    #[schema(example = 555)]
    pub number: Option<i64>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>, example = 100.0)]
    pub balance: Option<Decimal>,
}

impl AccountPayload {
    pub fn new(agency: i64, number: i64, balance: Decimal) -> Self {
        Self {
            id: None,
            agency: Some(agency),
            number: Some(number),
            balance: Some(balance),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_account_serializes_balance_as_number() {
        let account = Account {
            id: 2,
            agency: 10,
            number: 555,
            balance: Decimal::new(1000, 1),
        };
        let value = serde_json::to_value(&account).unwrap();
        assert_eq!(
            value,
            json!({"id": 2, "agency": 10, "number": 555, "balance": 100.0})
        );
    }

    #[test]
    fn test_payload_missing_fields_are_none() {
        let payload: AccountPayload = serde_json::from_value(json!({"agency": 10})).unwrap();
        assert_eq!(payload.agency, Some(10));
        assert!(payload.id.is_none());
        assert!(payload.number.is_none());
        assert!(payload.balance.is_none());
    }

    #[test]
    fn test_payload_accepts_integer_balance() {
        let payload: AccountPayload =
            serde_json::from_value(json!({"agency": 10, "number": 555, "balance": 100})).unwrap();
        assert_eq!(payload.balance, Some(Decimal::from(100)));
    }

    #[test]
    fn test_payload_rejects_wrong_type() {
        let result: Result<AccountPayload, _> =
            serde_json::from_value(json!({"agency": "ten", "number": 555, "balance": 1.0}));
        assert!(result.is_err());
    }

    #[test]
    fn test_draft_round_trip_keeps_id() {
        let account = Account {
            id: 7,
            agency: 1,
            number: 2,
            balance: Decimal::ZERO,
        };
        let draft = AccountDraft::from(account.clone());
        assert_eq!(draft.id, Some(7));
        assert_eq!(draft.into_account(7), account);
    }
}
