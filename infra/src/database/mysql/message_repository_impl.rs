//! MySQL implementation of the MessageRepository trait.
//!
//! Both mutation paths run inside a transaction that also carries the
//! wallet charge, so a message row and its billing can never disagree.
//! The delivery transition takes a `FOR UPDATE` lock on the message row;
//! combined with the terminal-state check this serializes concurrent
//! callbacks for the same provider id.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use sika_core::domain::entities::message::{Message, MessageStatus};
use sika_core::errors::{DomainError, DomainResult, SmsError};
use sika_core::repositories::message::{MessageRepository, TransitionOutcome};
use sika_shared::types::Money;

/// MySQL implementation of MessageRepository
pub struct MySqlMessageRepository {
    pool: MySqlPool,
}

impl MySqlMessageRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_message(row: &sqlx::mysql::MySqlRow) -> Result<Message, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Database {
            message: format!("Failed to get id: {}", e),
        })?;
        let account_id: String = row
            .try_get("account_id")
            .map_err(|e| DomainError::Database {
                message: format!("Failed to get account_id: {}", e),
            })?;
        let status_str: String = row.try_get("status").map_err(|e| DomainError::Database {
            message: format!("Failed to get status: {}", e),
        })?;
        let status = MessageStatus::parse(&status_str).ok_or_else(|| DomainError::Database {
            message: format!("Unknown message status in database: {}", status_str),
        })?;

        Ok(Message {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Database {
                message: format!("Invalid UUID: {}", e),
            })?,
            account_id: Uuid::parse_str(&account_id).map_err(|e| DomainError::Database {
                message: format!("Invalid UUID: {}", e),
            })?,
            recipient: row.try_get("recipient").map_err(|e| DomainError::Database {
                message: format!("Failed to get recipient: {}", e),
            })?,
            body: row.try_get("body").map_err(|e| DomainError::Database {
                message: format!("Failed to get body: {}", e),
            })?,
            status,
            provider_message_id: row
                .try_get("provider_message_id")
                .map_err(|e| DomainError::Database {
                    message: format!("Failed to get provider_message_id: {}", e),
                })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Database {
                    message: format!("Failed to get created_at: {}", e),
                })?,
        })
    }
}

#[async_trait]
impl MessageRepository for MySqlMessageRepository {
    async fn insert_batch(&self, batch: &[Message], charge: Option<Money>) -> DomainResult<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let account_id = batch[0].account_id;
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Database {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        // Charge first: if the wallet no longer covers the batch the whole
        // transaction rolls back and no rows are written.
        if let Some(amount) = charge {
            let debit = sqlx::query(
                "UPDATE accounts SET sms_balance = sms_balance - ? WHERE id = ? AND sms_balance >= ?",
            )
            .bind(amount.minor_units())
            .bind(account_id.to_string())
            .bind(amount.minor_units())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to charge account: {}", e),
            })?;

            if debit.rows_affected() == 0 {
                let row = sqlx::query("SELECT sms_balance FROM accounts WHERE id = ?")
                    .bind(account_id.to_string())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(|e| DomainError::Database {
                        message: format!("Database query failed: {}", e),
                    })?
                    .ok_or_else(|| DomainError::NotFound {
                        resource: format!("account {}", account_id),
                    })?;
                let available: i64 =
                    row.try_get("sms_balance").map_err(|e| DomainError::Database {
                        message: format!("Failed to get sms_balance: {}", e),
                    })?;
                return Err(SmsError::InsufficientFunds {
                    required: amount,
                    available: Money::from_minor(available),
                }
                .into());
            }
        }

        let insert = r#"
            INSERT INTO messages (
                id, account_id, recipient, body, status,
                provider_message_id, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#;
        for message in batch {
            sqlx::query(insert)
                .bind(message.id.to_string())
                .bind(message.account_id.to_string())
                .bind(&message.recipient)
                .bind(&message.body)
                .bind(message.status.as_str())
                .bind(&message.provider_message_id)
                .bind(message.created_at)
                .execute(&mut *tx)
                .await
                .map_err(|e| DomainError::Database {
                    message: format!("Failed to insert message: {}", e),
                })?;
        }

        tx.commit().await.map_err(|e| DomainError::Database {
            message: format!("Failed to commit transaction: {}", e),
        })
    }

    async fn transition_by_provider_id(
        &self,
        provider_message_id: &str,
        new_status: MessageStatus,
        charge: Option<Money>,
    ) -> DomainResult<TransitionOutcome> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Database {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        let select = r#"
            SELECT id, account_id, recipient, body, status,
                   provider_message_id, created_at
            FROM messages
            WHERE provider_message_id = ?
            LIMIT 1
            FOR UPDATE
        "#;

        let row = sqlx::query(select)
            .bind(provider_message_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Database query failed: {}", e),
            })?
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("message with provider id {}", provider_message_id),
            })?;

        let mut message = Self::row_to_message(&row)?;

        if message.is_terminal() {
            tx.rollback().await.map_err(|e| DomainError::Database {
                message: format!("Failed to roll back transaction: {}", e),
            })?;
            return Ok(TransitionOutcome::AlreadyProcessed(message));
        }

        message
            .transition(new_status)
            .map_err(|e| DomainError::Internal {
                message: e.to_string(),
            })?;

        sqlx::query("UPDATE messages SET status = ? WHERE id = ?")
            .bind(message.status.as_str())
            .bind(message.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to update message status: {}", e),
            })?;

        if let Some(amount) = charge {
            sqlx::query("UPDATE accounts SET sms_balance = GREATEST(sms_balance - ?, 0) WHERE id = ?")
                .bind(amount.minor_units())
                .bind(message.account_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| DomainError::Database {
                    message: format!("Failed to charge account: {}", e),
                })?;
        }

        tx.commit().await.map_err(|e| DomainError::Database {
            message: format!("Failed to commit transaction: {}", e),
        })?;

        Ok(TransitionOutcome::Applied(message))
    }

    async fn list_by_account(&self, account_id: Uuid) -> DomainResult<Vec<Message>> {
        let query = r#"
            SELECT id, account_id, recipient, body, status,
                   provider_message_id, created_at
            FROM messages
            WHERE account_id = ?
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query)
            .bind(account_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Database query failed: {}", e),
            })?;

        rows.iter().map(Self::row_to_message).collect()
    }

    async fn status_counts(&self, account_id: Uuid) -> DomainResult<Vec<(MessageStatus, i64)>> {
        let query = r#"
            SELECT status, COUNT(*) as count
            FROM messages
            WHERE account_id = ?
            GROUP BY status
        "#;

        let rows = sqlx::query(query)
            .bind(account_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Database query failed: {}", e),
            })?;

        let mut counts = Vec::with_capacity(rows.len());
        for row in rows {
            let status_str: String = row.try_get("status").map_err(|e| DomainError::Database {
                message: format!("Failed to get status: {}", e),
            })?;
            let status =
                MessageStatus::parse(&status_str).ok_or_else(|| DomainError::Database {
                    message: format!("Unknown message status in database: {}", status_str),
                })?;
            let count: i64 = row.try_get("count").map_err(|e| DomainError::Database {
                message: format!("Failed to get count: {}", e),
            })?;
            counts.push((status, count));
        }
        Ok(counts)
    }
}
