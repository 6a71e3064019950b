//! SMS gateway interface.
//!
//! The gateway is the one outbound network dependency of the send path.
//! Implementations live in the infrastructure layer; the mock used by
//! service tests lives next to the tests.

use async_trait::async_trait;

use crate::errors::SmsError;

/// Per-recipient outcome of a gateway send
///
/// The provider may accept some recipients of a batch and reject others;
/// a recipient without a provider message id was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientAcceptance {
    /// Normalized recipient number
    pub recipient: String,

    /// Provider-assigned correlation id, present only on acceptance
    pub provider_message_id: Option<String>,
}

impl RecipientAcceptance {
    pub fn is_accepted(&self) -> bool {
        self.provider_message_id.is_some()
    }
}

/// Synchronous result of a gateway send request
#[derive(Debug, Clone, Default)]
pub struct GatewayAcceptance {
    pub recipients: Vec<RecipientAcceptance>,
}

impl GatewayAcceptance {
    /// Recipients the provider accepted
    pub fn accepted(&self) -> impl Iterator<Item = &RecipientAcceptance> {
        self.recipients.iter().filter(|r| r.is_accepted())
    }

    /// Recipients the provider rejected
    pub fn rejected(&self) -> impl Iterator<Item = &RecipientAcceptance> {
        self.recipients.iter().filter(|r| !r.is_accepted())
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted().count()
    }
}

/// Client for the external SMS provider
///
/// # Errors
/// * `SmsError::GatewayUnreachable` - transport failure or timeout; the
///   caller must leave no message rows and no balance change behind
/// * `SmsError::GatewayRejected` - the provider refused the whole batch
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send(
        &self,
        sender: &str,
        body: &str,
        recipients: &[String],
        callback_url: &str,
    ) -> Result<GatewayAcceptance, SmsError>;

    /// Name of the provider, for logging
    fn provider_name(&self) -> &str;
}
