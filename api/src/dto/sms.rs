//! DTOs for the SMS send, history and balance endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use sika_core::domain::entities::message::{Message, MessageStatus};
use sika_shared::types::Money;

/// Recipients accepted as a single number or a list of numbers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipients {
    One(String),
    Many(Vec<String>),
}

impl Recipients {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Recipients::One(number) => vec![number],
            Recipients::Many(numbers) => numbers,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendSmsRequest {
    /// One recipient or a list of recipients
    pub recipients: Recipients,

    /// Message body
    #[validate(length(min = 1, max = 1600))]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendSmsResponse {
    pub message: String,
    pub accepted: usize,
    pub rejected: Vec<String>,
    pub new_balance: Money,
}

/// A message as rendered in the history listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageView {
    pub id: Uuid,
    pub recipient: String,
    pub message: String,
    pub status: MessageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_message_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            recipient: message.recipient.clone(),
            message: message.body.clone(),
            status: message.status,
            provider_message_id: message.provider_message_id.clone(),
            created_at: message.created_at,
        }
    }
}

/// Per-status message counts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: i64,
    pub queued: i64,
    pub delivered: i64,
    pub failed: i64,
    pub expired: i64,
    pub total: i64,
}

impl StatusCounts {
    pub fn from_pairs(pairs: &[(MessageStatus, i64)]) -> Self {
        let mut counts = StatusCounts::default();
        for (status, count) in pairs {
            match status {
                MessageStatus::Pending => counts.pending = *count,
                MessageStatus::Queued => counts.queued = *count,
                MessageStatus::Delivered => counts.delivered = *count,
                MessageStatus::Failed => counts.failed = *count,
                MessageStatus::Expired => counts.expired = *count,
            }
            counts.total += *count;
        }
        counts
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub messages: Vec<MessageView>,
    pub counts: StatusCounts,
    pub balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: Money,
}
