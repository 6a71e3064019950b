//! Account entity representing a tenant of the platform.
//!
//! Accounts are created and managed by the account-management side of the
//! system; the SMS core reads the prepaid balance for cost checks and
//! mutates it through the wallet ledger only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sika_shared::types::Money;
use uuid::Uuid;

/// A business account holding a prepaid SMS balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: Uuid,

    /// Business name; doubles as the SMS sender id shown to recipients
    pub business_name: String,

    /// Prepaid SMS balance in minor units; never negative
    pub sms_balance: Money,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new account with a zero balance
    pub fn new(business_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            business_name,
            sms_balance: Money::ZERO,
            created_at: Utc::now(),
        }
    }

    /// Creates a new account with an opening balance
    pub fn with_balance(business_name: String, sms_balance: Money) -> Self {
        Self {
            sms_balance,
            ..Self::new(business_name)
        }
    }

    /// Whether the balance covers the given amount
    pub fn can_afford(&self, amount: Money) -> bool {
        self.sms_balance >= amount
    }
}
