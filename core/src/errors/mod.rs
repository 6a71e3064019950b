//! Domain-specific error types and error handling.

use sika_shared::types::Money;
use thiserror::Error;

/// Errors from the SMS send and delivery-reconciliation flows
#[derive(Error, Debug)]
pub enum SmsError {
    #[error("Invalid recipient: {recipient}")]
    InvalidRecipient { recipient: String },

    #[error("Recipient list is empty")]
    EmptyRecipients,

    #[error("Message body is empty")]
    EmptyMessage,

    #[error("Insufficient SMS balance: required {required}, available {available}")]
    InsufficientFunds { required: Money, available: Money },

    #[error("SMS gateway unreachable: {reason}")]
    GatewayUnreachable { reason: String },

    #[error("SMS gateway rejected the request: {reason}")]
    GatewayRejected { reason: String },

    #[error("Missing required fields: {fields}")]
    MissingFields { fields: String },

    #[error("Unknown delivery status: {status}")]
    UnknownStatus { status: String },
}

impl SmsError {
    /// Stable error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            SmsError::InvalidRecipient { .. } => "INVALID_RECIPIENT",
            SmsError::EmptyRecipients => "EMPTY_RECIPIENTS",
            SmsError::EmptyMessage => "EMPTY_MESSAGE",
            SmsError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            SmsError::GatewayUnreachable { .. } => "GATEWAY_UNREACHABLE",
            SmsError::GatewayRejected { .. } => "GATEWAY_REJECTED",
            SmsError::MissingFields { .. } => "MISSING_FIELDS",
            SmsError::UnknownStatus { .. } => "UNKNOWN_STATUS",
        }
    }
}

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to the SMS error taxonomy
    #[error(transparent)]
    Sms(#[from] SmsError),
}

impl DomainError {
    /// Stable error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::Database { .. } => "DATABASE_ERROR",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
            DomainError::Sms(err) => err.error_code(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sms_error_codes() {
        let err = SmsError::InvalidRecipient {
            recipient: "12".to_string(),
        };
        assert_eq!(err.error_code(), "INVALID_RECIPIENT");
        assert!(err.to_string().contains("12"));
    }

    #[test]
    fn test_insufficient_funds_message() {
        let err = SmsError::InsufficientFunds {
            required: Money::from_minor(300),
            available: Money::from_minor(50),
        };
        let message = err.to_string();
        assert!(message.contains("GHS 3.00"));
        assert!(message.contains("GHS 0.50"));
    }

    #[test]
    fn test_domain_error_bridges_sms_codes() {
        let err: DomainError = SmsError::EmptyRecipients.into();
        assert_eq!(err.error_code(), "EMPTY_RECIPIENTS");
    }
}
