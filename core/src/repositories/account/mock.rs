//! Mock implementation of AccountRepository for testing

use async_trait::async_trait;
use sika_shared::types::Money;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::errors::{DomainError, DomainResult, SmsError};

use super::trait_::AccountRepository;

/// Mock account repository for testing
///
/// The single write lock over the account map serializes every
/// check-and-debit, which is the same guarantee the MySQL implementation
/// gets from row locking.
pub struct MockAccountRepository {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl MockAccountRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Seed an account into the store
    pub async fn insert(&self, account: Account) {
        let mut accounts = self.accounts.write().await;
        accounts.insert(account.id, account);
    }
}

impl Default for MockAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).cloned())
    }

    async fn balance_of(&self, id: Uuid) -> DomainResult<Money> {
        let accounts = self.accounts.read().await;
        accounts
            .get(&id)
            .map(|a| a.sms_balance)
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("account {}", id),
            })
    }

    async fn credit(&self, id: Uuid, amount: Money) -> DomainResult<Money> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&id).ok_or_else(|| DomainError::NotFound {
            resource: format!("account {}", id),
        })?;
        account.sms_balance =
            account
                .sms_balance
                .checked_add(amount)
                .ok_or_else(|| DomainError::Internal {
                    message: "balance overflow".to_string(),
                })?;
        Ok(account.sms_balance)
    }

    async fn debit(&self, id: Uuid, amount: Money) -> DomainResult<Money> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&id).ok_or_else(|| DomainError::NotFound {
            resource: format!("account {}", id),
        })?;
        if account.sms_balance < amount {
            return Err(SmsError::InsufficientFunds {
                required: amount,
                available: account.sms_balance,
            }
            .into());
        }
        account.sms_balance = account.sms_balance.saturating_sub(amount);
        Ok(account.sms_balance)
    }

    async fn debit_clamped(&self, id: Uuid, amount: Money) -> DomainResult<Money> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&id).ok_or_else(|| DomainError::NotFound {
            resource: format!("account {}", id),
        })?;
        account.sms_balance = account.sms_balance.saturating_sub(amount);
        Ok(account.sms_balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_debit_refuses_overdraft() {
        let repo = MockAccountRepository::new();
        let account = Account::with_balance("Shop".to_string(), Money::from_minor(50));
        let id = account.id;
        repo.insert(account).await;

        let result = repo.debit(id, Money::from_minor(100)).await;
        assert!(matches!(
            result,
            Err(DomainError::Sms(SmsError::InsufficientFunds { .. }))
        ));
        // Balance untouched
        assert_eq!(repo.balance_of(id).await.unwrap(), Money::from_minor(50));
    }

    #[tokio::test]
    async fn test_debit_clamped_floors_at_zero() {
        let repo = MockAccountRepository::new();
        let account = Account::with_balance("Shop".to_string(), Money::from_minor(3));
        let id = account.id;
        repo.insert(account).await;

        let new_balance = repo.debit_clamped(id, Money::from_minor(5)).await.unwrap();
        assert_eq!(new_balance, Money::ZERO);
    }

    #[tokio::test]
    async fn test_credit_and_debit_sequence_stays_non_negative() {
        let repo = MockAccountRepository::new();
        let account = Account::new("Shop".to_string());
        let id = account.id;
        repo.insert(account).await;

        repo.credit(id, Money::from_minor(100)).await.unwrap();
        repo.debit(id, Money::from_minor(40)).await.unwrap();
        repo.debit(id, Money::from_minor(60)).await.unwrap();
        assert_eq!(repo.balance_of(id).await.unwrap(), Money::ZERO);

        let result = repo.debit(id, Money::from_minor(1)).await;
        assert!(result.is_err());
    }
}
