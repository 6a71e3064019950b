//! Message repository trait: the per-recipient message record store.
//!
//! The two mutation methods are transactional units: the message write and
//! the optional wallet charge either both persist or neither does. That
//! boundary is what keeps "message marked sent/delivered" and "balance
//! debited" from ever disagreeing.

use async_trait::async_trait;
use sika_shared::types::Money;
use uuid::Uuid;

use crate::domain::entities::message::{Message, MessageStatus};
use crate::errors::DomainResult;

/// Result of a provider-id status transition
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    /// The transition was applied (and any charge debited)
    Applied(Message),
    /// The message was already terminal; nothing changed, nothing charged
    AlreadyProcessed(Message),
}

/// Repository trait for message persistence
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a batch of messages atomically, optionally debiting the
    /// owning account by `charge` in the same transaction.
    ///
    /// All messages in one batch belong to one account. If the charge
    /// cannot be covered at commit time the whole batch rolls back with
    /// `SmsError::InsufficientFunds`.
    async fn insert_batch(&self, messages: &[Message], charge: Option<Money>) -> DomainResult<()>;

    /// Apply a status transition to the message with the given provider id,
    /// optionally debiting its account by `charge` (floored at zero) in the
    /// same transaction.
    ///
    /// The charge is applied only when the transition itself is applied; an
    /// already-terminal message yields `AlreadyProcessed` and no debit, so
    /// redelivered callbacks can never bill twice.
    ///
    /// # Returns
    /// * `Ok(TransitionOutcome)` - Applied or already processed
    /// * `Err(DomainError::NotFound)` - No message with that provider id
    async fn transition_by_provider_id(
        &self,
        provider_message_id: &str,
        new_status: MessageStatus,
        charge: Option<Money>,
    ) -> DomainResult<TransitionOutcome>;

    /// All messages for an account, newest first
    async fn list_by_account(&self, account_id: Uuid) -> DomainResult<Vec<Message>>;

    /// Message counts per status for an account
    async fn status_counts(&self, account_id: Uuid) -> DomainResult<Vec<(MessageStatus, i64)>>;
}
