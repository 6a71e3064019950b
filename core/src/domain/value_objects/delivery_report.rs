//! Normalized delivery report.
//!
//! Providers deliver callbacks over several transports with several field
//! spellings. The API layer normalizes whatever arrives into this one shape
//! before any business logic runs.

use serde::{Deserialize, Serialize};

use crate::domain::entities::message::MessageStatus;

/// Delivery outcome reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportedStatus {
    Delivered,
    Failed,
    Expired,
}

impl ReportedStatus {
    /// Parse a reported status string, case-insensitively
    pub fn parse(s: &str) -> Option<ReportedStatus> {
        match s.to_ascii_lowercase().as_str() {
            "delivered" => Some(ReportedStatus::Delivered),
            "failed" => Some(ReportedStatus::Failed),
            "expired" => Some(ReportedStatus::Expired),
            _ => None,
        }
    }

    /// The message status this report transitions to
    pub fn as_message_status(&self) -> MessageStatus {
        match self {
            ReportedStatus::Delivered => MessageStatus::Delivered,
            ReportedStatus::Failed => MessageStatus::Failed,
            ReportedStatus::Expired => MessageStatus::Expired,
        }
    }
}

/// A structurally valid delivery report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    /// Provider-assigned message id the report refers to
    pub provider_message_id: String,

    /// Reported outcome
    pub status: ReportedStatus,
}
