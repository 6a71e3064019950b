//! Message entity: one outbound SMS to one recipient.
//!
//! A multi-recipient send fans out into independent Message rows, each
//! reconciled on its own by the delivery webhook. Messages are append-only
//! history; once a message reaches a terminal status it never changes again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Lifecycle status of a message
///
/// `Pending → Queued → {Delivered, Failed, Expired}`. The terminal states
/// are final: any further transition attempt is reported as already
/// processed so that redelivered provider callbacks stay no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    /// Created locally, not yet accepted by the provider
    Pending,
    /// Accepted by the provider, awaiting a delivery outcome
    Queued,
    /// Confirmed delivered to the handset
    Delivered,
    /// Delivery failed
    Failed,
    /// Expired before the provider could deliver it
    Expired,
}

impl MessageStatus {
    /// Whether this status is final
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MessageStatus::Delivered | MessageStatus::Failed | MessageStatus::Expired
        )
    }

    /// The state machine: which transitions are allowed
    pub fn can_transition_to(&self, next: MessageStatus) -> bool {
        match self {
            MessageStatus::Pending => next != MessageStatus::Pending,
            MessageStatus::Queued => next.is_terminal(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Pending => "pending",
            MessageStatus::Queued => "queued",
            MessageStatus::Delivered => "delivered",
            MessageStatus::Failed => "failed",
            MessageStatus::Expired => "expired",
        }
    }

    /// Parse a status string, case-insensitively
    pub fn parse(s: &str) -> Option<MessageStatus> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Some(MessageStatus::Pending),
            "queued" => Some(MessageStatus::Queued),
            "delivered" => Some(MessageStatus::Delivered),
            "failed" => Some(MessageStatus::Failed),
            "expired" => Some(MessageStatus::Expired),
            _ => None,
        }
    }
}

/// Why a requested status transition was not applied
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TransitionBlocked {
    #[error("Message already in terminal status {current:?}")]
    AlreadyProcessed { current: MessageStatus },

    #[error("Transition {from:?} -> {to:?} is not allowed")]
    NotAllowed { from: MessageStatus, to: MessageStatus },
}

/// One outbound SMS to one recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Locally generated identifier
    pub id: Uuid,

    /// Owning account
    pub account_id: Uuid,

    /// Normalized recipient phone number
    pub recipient: String,

    /// Message body text
    pub body: String,

    /// Lifecycle status
    pub status: MessageStatus,

    /// Provider-assigned correlation id; set once the gateway accepts the send
    pub provider_message_id: Option<String>,

    /// Timestamp when the message was created
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Creates a new pending message, not yet dispatched to the provider
    pub fn new_pending(account_id: Uuid, recipient: String, body: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            recipient,
            body,
            status: MessageStatus::Pending,
            provider_message_id: None,
            created_at: Utc::now(),
        }
    }

    /// Marks the message as accepted by the provider under the given id
    pub fn accept(&mut self, provider_message_id: impl Into<String>) {
        self.provider_message_id = Some(provider_message_id.into());
        self.status = MessageStatus::Queued;
    }

    /// Whether the message has reached a final status
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Applies a status transition, enforcing the state machine
    pub fn transition(&mut self, next: MessageStatus) -> Result<(), TransitionBlocked> {
        if self.status.is_terminal() {
            return Err(TransitionBlocked::AlreadyProcessed {
                current: self.status,
            });
        }
        if !self.status.can_transition_to(next) {
            return Err(TransitionBlocked::NotAllowed {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queued_message() -> Message {
        let mut message = Message::new_pending(
            Uuid::new_v4(),
            "233241234567".to_string(),
            "Stock arrives Friday".to_string(),
        );
        message.accept("prov-123");
        message
    }

    #[test]
    fn test_new_pending() {
        let message = Message::new_pending(
            Uuid::new_v4(),
            "233241234567".to_string(),
            "hello".to_string(),
        );
        assert_eq!(message.status, MessageStatus::Pending);
        assert!(message.provider_message_id.is_none());
        assert!(!message.is_terminal());
    }

    #[test]
    fn test_accept_moves_to_queued() {
        let message = queued_message();
        assert_eq!(message.status, MessageStatus::Queued);
        assert_eq!(message.provider_message_id.as_deref(), Some("prov-123"));
    }

    #[test]
    fn test_queued_to_terminal_transitions() {
        for terminal in [
            MessageStatus::Delivered,
            MessageStatus::Failed,
            MessageStatus::Expired,
        ] {
            let mut message = queued_message();
            assert!(message.transition(terminal).is_ok());
            assert_eq!(message.status, terminal);
        }
    }

    #[test]
    fn test_terminal_is_immutable() {
        let mut message = queued_message();
        message.transition(MessageStatus::Delivered).unwrap();

        let result = message.transition(MessageStatus::Failed);
        assert_eq!(
            result,
            Err(TransitionBlocked::AlreadyProcessed {
                current: MessageStatus::Delivered
            })
        );
        assert_eq!(message.status, MessageStatus::Delivered);

        // Replaying the same terminal status is also blocked
        let result = message.transition(MessageStatus::Delivered);
        assert!(matches!(
            result,
            Err(TransitionBlocked::AlreadyProcessed { .. })
        ));
    }

    #[test]
    fn test_queued_cannot_regress() {
        let mut message = queued_message();
        let result = message.transition(MessageStatus::Pending);
        assert_eq!(
            result,
            Err(TransitionBlocked::NotAllowed {
                from: MessageStatus::Queued,
                to: MessageStatus::Pending,
            })
        );
    }

    #[test]
    fn test_status_parse_case_insensitive() {
        assert_eq!(MessageStatus::parse("DELIVERED"), Some(MessageStatus::Delivered));
        assert_eq!(MessageStatus::parse("Failed"), Some(MessageStatus::Failed));
        assert_eq!(MessageStatus::parse("expired"), Some(MessageStatus::Expired));
        assert_eq!(MessageStatus::parse("unknown"), None);
    }

    #[test]
    fn test_serialization() {
        let message = queued_message();
        let json = serde_json::to_string(&message).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(message, deserialized);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&MessageStatus::Delivered).unwrap();
        assert_eq!(json, "\"delivered\"");
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            MessageStatus::Pending,
            MessageStatus::Queued,
            MessageStatus::Delivered,
            MessageStatus::Failed,
            MessageStatus::Expired,
        ] {
            assert_eq!(MessageStatus::parse(status.as_str()), Some(status));
        }
    }
}
