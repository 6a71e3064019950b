//! Mapping from domain errors to HTTP responses.
//!
//! One place decides the status code per error variant, so every handler
//! reports failures the same way.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;

use sika_core::errors::{DomainError, SmsError};
use sika_shared::types::ErrorResponse;

/// HTTP status for a domain error
pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Sms(sms) => match sms {
            SmsError::InvalidRecipient { .. }
            | SmsError::EmptyRecipients
            | SmsError::EmptyMessage
            | SmsError::MissingFields { .. }
            | SmsError::UnknownStatus { .. } => StatusCode::BAD_REQUEST,
            SmsError::InsufficientFunds { .. } => StatusCode::FORBIDDEN,
            SmsError::GatewayUnreachable { .. } | SmsError::GatewayRejected { .. } => {
                StatusCode::BAD_GATEWAY
            }
        },
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Database { .. } | DomainError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Build the error response for a domain error
pub fn domain_error_response(err: &DomainError) -> HttpResponse {
    HttpResponse::build(status_for(err)).json(ErrorResponse::new(err.error_code(), err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sika_shared::types::Money;

    #[test]
    fn test_validation_errors_are_bad_request() {
        let err: DomainError = SmsError::InvalidRecipient {
            recipient: "12".to_string(),
        }
        .into();
        assert_eq!(status_for(&err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_insufficient_funds_is_forbidden() {
        let err: DomainError = SmsError::InsufficientFunds {
            required: Money::from_minor(100),
            available: Money::from_minor(50),
        }
        .into();
        assert_eq!(status_for(&err), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_gateway_failures_are_bad_gateway() {
        let unreachable: DomainError = SmsError::GatewayUnreachable {
            reason: "timeout".to_string(),
        }
        .into();
        let rejected: DomainError = SmsError::GatewayRejected {
            reason: "bad key".to_string(),
        }
        .into();
        assert_eq!(status_for(&unreachable), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(&rejected), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_not_found_and_internal() {
        let not_found = DomainError::NotFound {
            resource: "message".to_string(),
        };
        let internal = DomainError::Internal {
            message: "boom".to_string(),
        };
        assert_eq!(status_for(&not_found), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&internal), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
