//! Mock implementation of MessageRepository for testing

use async_trait::async_trait;
use sika_shared::types::Money;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::message::{Message, MessageStatus};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::account::r#trait::AccountRepository;
use crate::repositories::account::MockAccountRepository;

use super::trait_::{MessageRepository, TransitionOutcome};

/// Mock message repository for testing
///
/// Optionally shares a ledger with `MockAccountRepository` so that the
/// charge attached to `insert_batch`/`transition_by_provider_id` actually
/// moves the balance, mirroring the MySQL implementation's shared pool.
pub struct MockMessageRepository {
    messages: Arc<RwLock<Vec<Message>>>,
    ledger: Option<Arc<MockAccountRepository>>,
}

impl MockMessageRepository {
    /// Create a mock with no ledger; charges are ignored
    pub fn new() -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
            ledger: None,
        }
    }

    /// Create a mock whose charges debit the given ledger
    pub fn with_ledger(ledger: Arc<MockAccountRepository>) -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
            ledger: Some(ledger),
        }
    }

    /// Seed a message into the store
    pub async fn insert(&self, message: Message) {
        let mut messages = self.messages.write().await;
        messages.push(message);
    }

    /// Number of stored messages
    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }

    /// Fetch a message by provider id
    pub async fn find_by_provider_id(&self, provider_message_id: &str) -> Option<Message> {
        let messages = self.messages.read().await;
        messages
            .iter()
            .find(|m| m.provider_message_id.as_deref() == Some(provider_message_id))
            .cloned()
    }
}

impl Default for MockMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageRepository for MockMessageRepository {
    async fn insert_batch(&self, batch: &[Message], charge: Option<Money>) -> DomainResult<()> {
        if batch.is_empty() {
            return Ok(());
        }

        // Debit first: a failed charge must leave no rows behind
        if let Some(amount) = charge {
            if let Some(ledger) = &self.ledger {
                ledger.debit(batch[0].account_id, amount).await?;
            }
        }

        let mut messages = self.messages.write().await;
        messages.extend_from_slice(batch);
        Ok(())
    }

    async fn transition_by_provider_id(
        &self,
        provider_message_id: &str,
        new_status: MessageStatus,
        charge: Option<Money>,
    ) -> DomainResult<TransitionOutcome> {
        let mut messages = self.messages.write().await;
        let message = messages
            .iter_mut()
            .find(|m| m.provider_message_id.as_deref() == Some(provider_message_id))
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("message with provider id {}", provider_message_id),
            })?;

        if message.is_terminal() {
            return Ok(TransitionOutcome::AlreadyProcessed(message.clone()));
        }

        message
            .transition(new_status)
            .map_err(|e| DomainError::Internal {
                message: e.to_string(),
            })?;
        let updated = message.clone();
        drop(messages);

        if let Some(amount) = charge {
            if let Some(ledger) = &self.ledger {
                ledger.debit_clamped(updated.account_id, amount).await?;
            }
        }

        Ok(TransitionOutcome::Applied(updated))
    }

    async fn list_by_account(&self, account_id: Uuid) -> DomainResult<Vec<Message>> {
        let messages = self.messages.read().await;
        let mut result: Vec<Message> = messages
            .iter()
            .filter(|m| m.account_id == account_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn status_counts(&self, account_id: Uuid) -> DomainResult<Vec<(MessageStatus, i64)>> {
        let messages = self.messages.read().await;
        let mut counts: Vec<(MessageStatus, i64)> = Vec::new();
        for message in messages.iter().filter(|m| m.account_id == account_id) {
            match counts.iter_mut().find(|(s, _)| *s == message.status) {
                Some((_, n)) => *n += 1,
                None => counts.push((message.status, 1)),
            }
        }
        Ok(counts)
    }
}
