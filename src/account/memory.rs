use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use super::error::StorageError;
use super::models::{Account, AccountDraft};
use super::repository::AccountRepository;
use crate::config::SeedAccountConfig;

/// In-memory account repository.
///
/// Thread-safe storage using DashMap. `numbers` and `agencies` map each unique
/// code to the id that owns it, so a code is claimed atomically per key.
/// Used when no PostgreSQL URL is configured, and in tests.
pub struct InMemoryAccountRepository {
    accounts: Arc<DashMap<i64, Account>>,
    numbers: Arc<DashMap<i64, i64>>,
    agencies: Arc<DashMap<i64, i64>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryAccountRepository {
    /// Empty store, ids start at 1
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(DashMap::new()),
            numbers: Arc::new(DashMap::new()),
            agencies: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Store holding the protected account with default values
    pub fn seeded() -> Self {
        Self::with_seed(&SeedAccountConfig::default())
    }

    /// Store holding the protected account; ids for new accounts start after it
    pub fn with_seed(seed: &SeedAccountConfig) -> Self {
        let repo = Self::new();
        let id = super::PROTECTED_ACCOUNT_ID;
        repo.numbers.insert(seed.number, id);
        repo.agencies.insert(seed.agency, id);
        repo.accounts.insert(
            id,
            Account {
                id,
                agency: seed.agency,
                number: seed.number,
                balance: seed.balance,
            },
        );
        repo.next_id.store(id + 1, Ordering::SeqCst);
        repo
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Reserve `code` for `id`. Fails when another account already owns it.
fn claim(index: &DashMap<i64, i64>, code: i64, id: i64, column: &str) -> Result<(), StorageError> {
    match index.entry(code) {
        Entry::Occupied(owner) if *owner.get() != id => {
            Err(StorageError::Duplicate(column.to_string()))
        }
        Entry::Occupied(_) => Ok(()),
        Entry::Vacant(slot) => {
            slot.insert(id);
            Ok(())
        }
    }
}

fn release(index: &DashMap<i64, i64>, code: i64, id: i64) {
    index.remove_if(&code, |_, owner| *owner == id);
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryAccountRepository {
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
            numbers: Arc::clone(&self.numbers),
            agencies: Arc::clone(&self.agencies),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn find_all(&self) -> Result<Vec<Account>, StorageError> {
        let mut accounts: Vec<Account> = self.accounts.iter().map(|a| a.value().clone()).collect();
        accounts.sort_by_key(|a| a.id);
        Ok(accounts)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StorageError> {
        Ok(self.accounts.get(&id).map(|a| a.value().clone()))
    }

    async fn exists_by_number(&self, number: i64) -> Result<bool, StorageError> {
        Ok(self.numbers.contains_key(&number))
    }

    async fn exists_by_agency(&self, agency: i64) -> Result<bool, StorageError> {
        Ok(self.agencies.contains_key(&agency))
    }

    async fn save(&self, account: AccountDraft) -> Result<Account, StorageError> {
        let id = match account.id {
            Some(id) => {
                // Keep the sequence ahead of explicitly stored ids
                self.next_id.fetch_max(id + 1, Ordering::SeqCst);
                id
            }
            None => self.next_id.fetch_add(1, Ordering::SeqCst),
        };
        let previous = self.accounts.get(&id).map(|a| a.value().clone());
        let new_number = previous.as_ref().is_none_or(|p| p.number != account.number);

        claim(&self.numbers, account.number, id, "number")?;
        if let Err(e) = claim(&self.agencies, account.agency, id, "agency") {
            if new_number {
                release(&self.numbers, account.number, id);
            }
            return Err(e);
        }

        if let Some(prev) = previous {
            if prev.number != account.number {
                release(&self.numbers, prev.number, id);
            }
            if prev.agency != account.agency {
                release(&self.agencies, prev.agency, id);
            }
        }

        let saved = account.into_account(id);
        self.accounts.insert(id, saved.clone());
        Ok(saved)
    }

    async fn delete(&self, account: &Account) -> Result<(), StorageError> {
        if let Some((_, removed)) = self.accounts.remove(&account.id) {
            release(&self.numbers, removed.number, removed.id);
            release(&self.agencies, removed.agency, removed.id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let repo = InMemoryAccountRepository::new();
        let a = repo
            .save(AccountDraft::new(10, 555, Decimal::from(100)))
            .await
            .unwrap();
        let b = repo
            .save(AccountDraft::new(11, 556, Decimal::from(5)))
            .await
            .unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_seeded_store_starts_after_protected_id() {
        let repo = InMemoryAccountRepository::seeded();
        assert!(repo.find_by_id(1).await.unwrap().is_some());

        let created = repo
            .save(AccountDraft::new(10, 555, Decimal::from(100)))
            .await
            .unwrap();
        assert_eq!(created.id, 2);
    }

    #[tokio::test]
    async fn test_save_with_id_overwrites() {
        let repo = InMemoryAccountRepository::new();
        let created = repo
            .save(AccountDraft::new(10, 555, Decimal::from(100)))
            .await
            .unwrap();

        let mut draft = AccountDraft::from(created.clone());
        draft.balance = Decimal::from(7);
        let updated = repo.save(draft).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(repo.len(), 1);
        assert_eq!(
            repo.find_by_id(created.id).await.unwrap().unwrap().balance,
            Decimal::from(7)
        );
    }

    #[tokio::test]
    async fn test_save_with_explicit_id_advances_sequence() {
        let repo = InMemoryAccountRepository::new();
        let mut draft = AccountDraft::new(1, 1, Decimal::ZERO);
        draft.id = Some(40);
        repo.save(draft).await.unwrap();

        let next = repo
            .save(AccountDraft::new(2, 2, Decimal::ZERO))
            .await
            .unwrap();
        assert_eq!(next.id, 41);
    }

    #[tokio::test]
    async fn test_exists_checks_and_delete() {
        let repo = InMemoryAccountRepository::new();
        let account = repo
            .save(AccountDraft::new(10, 555, Decimal::from(100)))
            .await
            .unwrap();

        assert!(repo.exists_by_number(555).await.unwrap());
        assert!(repo.exists_by_agency(10).await.unwrap());
        assert!(!repo.exists_by_number(10).await.unwrap());

        repo.delete(&account).await.unwrap();
        assert!(repo.is_empty());
        assert!(!repo.exists_by_agency(10).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_all_is_ordered_by_id() {
        let repo = InMemoryAccountRepository::new();
        for code in [30, 10, 20] {
            repo.save(AccountDraft::new(code, code, Decimal::ZERO))
                .await
                .unwrap();
        }
        let ids: Vec<i64> = repo.find_all().await.unwrap().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_save_rejects_taken_codes() {
        let repo = InMemoryAccountRepository::seeded();
        repo.save(AccountDraft::new(10, 555, Decimal::from(100)))
            .await
            .unwrap();

        let err = repo
            .save(AccountDraft::new(11, 555, Decimal::ZERO))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Duplicate(ref c) if c == "number"));

        let err = repo
            .save(AccountDraft::new(10, 556, Decimal::ZERO))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Duplicate(ref c) if c == "agency"));

        // The failed agency claim must not leave number 556 reserved
        assert!(!repo.exists_by_number(556).await.unwrap());
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_update_releases_old_codes() {
        let repo = InMemoryAccountRepository::new();
        let created = repo
            .save(AccountDraft::new(10, 555, Decimal::ZERO))
            .await
            .unwrap();

        let mut draft = AccountDraft::from(created);
        draft.number = 777;
        repo.save(draft).await.unwrap();

        assert!(!repo.exists_by_number(555).await.unwrap());
        assert!(repo.exists_by_number(777).await.unwrap());
        assert!(repo.exists_by_agency(10).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_keep_number_unique() {
        let repo = InMemoryAccountRepository::seeded();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.save(AccountDraft::new(100 + i, 555, Decimal::ZERO)).await
                })
            })
            .collect();

        let mut stored = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => stored += 1,
                Err(e) => assert!(matches!(e, StorageError::Duplicate(_))),
            }
        }
        assert_eq!(stored, 1);
        assert_eq!(repo.len(), 2);
    }
}
