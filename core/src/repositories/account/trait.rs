//! Account repository trait: the wallet ledger.
//!
//! All balance mutations go through this interface. Implementations must
//! serialize concurrent check-and-debit operations on the same account
//! (row-level locking or an equivalent conditional update) so that two
//! concurrent sends can never both pass a stale sufficiency check.

use async_trait::async_trait;
use sika_shared::types::Money;
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::errors::DomainResult;

/// Repository trait for account balance operations
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by its unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(Account))` - Account found
    /// * `Ok(None)` - No account with the given id
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Account>>;

    /// Read the current prepaid balance
    ///
    /// # Returns
    /// * `Ok(Money)` - Current balance
    /// * `Err(DomainError::NotFound)` - Unknown account
    async fn balance_of(&self, id: Uuid) -> DomainResult<Money>;

    /// Add funds to the balance (top-up or refund)
    ///
    /// # Returns
    /// * `Ok(Money)` - The new balance
    async fn credit(&self, id: Uuid, amount: Money) -> DomainResult<Money>;

    /// Remove funds from the balance, failing if it would go negative
    ///
    /// # Returns
    /// * `Ok(Money)` - The new balance
    /// * `Err(SmsError::InsufficientFunds)` - Balance would go negative;
    ///   nothing was debited
    async fn debit(&self, id: Uuid, amount: Money) -> DomainResult<Money>;

    /// Remove funds from the balance, flooring the result at zero
    ///
    /// Used by the delivery-time billing trigger, where the business policy
    /// is to absorb a shortfall rather than leave a message unbilled.
    ///
    /// # Returns
    /// * `Ok(Money)` - The new balance (possibly zero)
    async fn debit_clamped(&self, id: Uuid, amount: Money) -> DomainResult<Money>;
}
