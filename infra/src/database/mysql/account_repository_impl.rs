//! MySQL implementation of the AccountRepository trait.
//!
//! Balance mutations use single conditional UPDATE statements so that
//! concurrent check-and-debit operations serialize on the account row;
//! the sufficiency check and the subtraction are one atomic statement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use sika_core::domain::entities::account::Account;
use sika_core::errors::{DomainError, DomainResult, SmsError};
use sika_core::repositories::account::AccountRepository;
use sika_shared::types::Money;

/// MySQL implementation of AccountRepository
pub struct MySqlAccountRepository {
    pool: MySqlPool,
}

impl MySqlAccountRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_account(row: &sqlx::mysql::MySqlRow) -> Result<Account, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::Database {
                message: format!("Failed to get id: {}", e),
            })?;
        let sms_balance: i64 = row
            .try_get("sms_balance")
            .map_err(|e| DomainError::Database {
                message: format!("Failed to get sms_balance: {}", e),
            })?;

        Ok(Account {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Database {
                message: format!("Invalid UUID: {}", e),
            })?,
            business_name: row
                .try_get("business_name")
                .map_err(|e| DomainError::Database {
                    message: format!("Failed to get business_name: {}", e),
                })?,
            sms_balance: Money::from_minor(sms_balance),
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Database {
                    message: format!("Failed to get created_at: {}", e),
                })?,
        })
    }

    async fn fetch_balance(&self, id: Uuid) -> DomainResult<Money> {
        let row = sqlx::query("SELECT sms_balance FROM accounts WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Database query failed: {}", e),
            })?
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("account {}", id),
            })?;

        let balance: i64 = row.try_get("sms_balance").map_err(|e| DomainError::Database {
            message: format!("Failed to get sms_balance: {}", e),
        })?;
        Ok(Money::from_minor(balance))
    }
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Account>> {
        let query = r#"
            SELECT id, business_name, sms_balance, created_at
            FROM accounts
            WHERE id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Database query failed: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    async fn balance_of(&self, id: Uuid) -> DomainResult<Money> {
        self.fetch_balance(id).await
    }

    async fn credit(&self, id: Uuid, amount: Money) -> DomainResult<Money> {
        let result = sqlx::query("UPDATE accounts SET sms_balance = sms_balance + ? WHERE id = ?")
            .bind(amount.minor_units())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to credit account: {}", e),
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: format!("account {}", id),
            });
        }

        self.fetch_balance(id).await
    }

    async fn debit(&self, id: Uuid, amount: Money) -> DomainResult<Money> {
        // One conditional statement: the row either covers the amount and
        // is debited, or is left untouched.
        let query = r#"
            UPDATE accounts
            SET sms_balance = sms_balance - ?
            WHERE id = ? AND sms_balance >= ?
        "#;

        let result = sqlx::query(query)
            .bind(amount.minor_units())
            .bind(id.to_string())
            .bind(amount.minor_units())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to debit account: {}", e),
            })?;

        if result.rows_affected() == 0 {
            let available = self.fetch_balance(id).await?;
            return Err(SmsError::InsufficientFunds {
                required: amount,
                available,
            }
            .into());
        }

        self.fetch_balance(id).await
    }

    async fn debit_clamped(&self, id: Uuid, amount: Money) -> DomainResult<Money> {
        let query = r#"
            UPDATE accounts
            SET sms_balance = GREATEST(sms_balance - ?, 0)
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(amount.minor_units())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to debit account: {}", e),
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: format!("account {}", id),
            });
        }

        self.fetch_balance(id).await
    }
}
