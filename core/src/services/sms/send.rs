//! The SMS send service.

use sika_shared::config::{BillingConfig, BillingPolicy};
use sika_shared::types::Money;
use sika_shared::utils::phone;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::message::Message;
use crate::errors::{DomainError, DomainResult, SmsError};
use crate::repositories::account::AccountRepository;
use crate::repositories::message::MessageRepository;

use super::cost::RateCard;
use super::gateway::SmsGateway;

/// Result of an accepted send request
#[derive(Debug, Clone)]
pub struct SendOutcome {
    /// The persisted messages, one per accepted recipient
    pub messages: Vec<Message>,

    /// Recipients the provider rejected within the batch
    pub rejected: Vec<String>,

    /// Balance after any send-time charge
    pub new_balance: Money,
}

/// Orchestrates the send path: validation, pricing, wallet check, gateway
/// dispatch, and the atomic persist-and-charge of the accepted subset.
pub struct SmsSendService<A, M, G>
where
    A: AccountRepository,
    M: MessageRepository,
    G: SmsGateway,
{
    accounts: Arc<A>,
    messages: Arc<M>,
    gateway: Arc<G>,
    rates: RateCard,
    billing: BillingConfig,
    callback_url: String,
}

impl<A, M, G> SmsSendService<A, M, G>
where
    A: AccountRepository,
    M: MessageRepository,
    G: SmsGateway,
{
    pub fn new(
        accounts: Arc<A>,
        messages: Arc<M>,
        gateway: Arc<G>,
        billing: BillingConfig,
        callback_url: String,
    ) -> Self {
        Self {
            accounts,
            messages,
            gateway,
            rates: RateCard::new(billing.unit_cost),
            billing,
            callback_url,
        }
    }

    /// Send one message body to one or more recipients.
    ///
    /// The whole batch is validated before any network call or balance
    /// check; a single bad number rejects the request with no side
    /// effects. On provider acceptance, exactly the accepted subset is
    /// persisted (queued, with provider ids), atomically with the
    /// send-time charge when the billing policy debits on send.
    pub async fn send(
        &self,
        account_id: Uuid,
        recipients: &[String],
        body: &str,
    ) -> DomainResult<SendOutcome> {
        if body.trim().is_empty() {
            return Err(SmsError::EmptyMessage.into());
        }
        if recipients.is_empty() {
            return Err(SmsError::EmptyRecipients.into());
        }

        // Normalize and validate every recipient up front; de-duplicate
        // preserving order so one recipient gets one message per request.
        let mut normalized: Vec<String> = Vec::with_capacity(recipients.len());
        for raw in recipients {
            let number = phone::normalize_recipient(raw);
            if !phone::is_valid_recipient(&number) {
                tracing::warn!(
                    recipient = %phone::mask_phone(&number),
                    "rejecting send request: invalid recipient"
                );
                return Err(SmsError::InvalidRecipient {
                    recipient: raw.clone(),
                }
                .into());
            }
            if !normalized.contains(&number) {
                normalized.push(number);
            }
        }

        let cost = self.rates.batch_cost(normalized.len());

        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("account {}", account_id),
            })?;

        if !account.can_afford(cost) {
            tracing::info!(
                account_id = %account_id,
                required = %cost,
                available = %account.sms_balance,
                "send rejected: insufficient balance"
            );
            return Err(SmsError::InsufficientFunds {
                required: cost,
                available: account.sms_balance,
            }
            .into());
        }

        tracing::info!(
            account_id = %account_id,
            recipients = normalized.len(),
            provider = self.gateway.provider_name(),
            "dispatching SMS batch"
        );

        let acceptance = self
            .gateway
            .send(&account.business_name, body, &normalized, &self.callback_url)
            .await?;

        let mut messages: Vec<Message> = Vec::with_capacity(acceptance.accepted_count());
        for entry in acceptance.accepted() {
            let mut message =
                Message::new_pending(account_id, entry.recipient.clone(), body.to_string());
            if let Some(provider_id) = &entry.provider_message_id {
                message.accept(provider_id.clone());
            }
            messages.push(message);
        }
        let rejected: Vec<String> = acceptance
            .rejected()
            .map(|r| r.recipient.clone())
            .collect();

        if messages.is_empty() {
            return Err(SmsError::GatewayRejected {
                reason: "provider accepted no recipients".to_string(),
            }
            .into());
        }

        // The charge covers only what the provider accepted; a concurrent
        // send that drained the wallet in the meantime rolls the batch back.
        let charge = match self.billing.policy {
            BillingPolicy::OnSend => Some(self.rates.batch_cost(messages.len())),
            BillingPolicy::OnDelivery => None,
        };
        self.messages.insert_batch(&messages, charge).await?;

        let new_balance = self.accounts.balance_of(account_id).await?;

        tracing::info!(
            account_id = %account_id,
            accepted = messages.len(),
            rejected = rejected.len(),
            new_balance = %new_balance,
            "SMS batch persisted"
        );

        Ok(SendOutcome {
            messages,
            rejected,
            new_balance,
        })
    }
}
