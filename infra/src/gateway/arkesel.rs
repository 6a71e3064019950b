//! Arkesel SMS gateway client.
//!
//! Speaks the Arkesel v2 bulk SMS API: one POST per batch with an
//! `api-key` header, JSON body `{sender, message, recipients, callback_url}`,
//! and a response that reports per-recipient acceptance (or, on some plans,
//! a single batch id). Transport failures and the request timeout map to
//! `GatewayUnreachable`; logical provider failures map to `GatewayRejected`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use sika_core::errors::SmsError;
use sika_core::services::sms::gateway::{GatewayAcceptance, RecipientAcceptance, SmsGateway};
use sika_shared::config::GatewayConfig;
use sika_shared::utils::phone::mask_phone;

use crate::InfrastructureError;

/// Arkesel client configuration
#[derive(Debug, Clone)]
pub struct ArkeselConfig {
    /// Base URL of the Arkesel API
    pub base_url: String,
    /// API key sent in the `api-key` header
    pub api_key: String,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl From<&GatewayConfig> for ArkeselConfig {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            request_timeout_secs: config.request_timeout_secs,
        }
    }
}

/// Arkesel SMS gateway implementation
pub struct ArkeselGateway {
    client: reqwest::Client,
    config: ArkeselConfig,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    sender: &'a str,
    message: &'a str,
    recipients: &'a [String],
    callback_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ArkeselResponse {
    status: Option<String>,
    message: Option<String>,
    #[serde(default)]
    data: Option<ArkeselData>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ArkeselData {
    PerRecipient(Vec<ArkeselEntry>),
    Batch { id: String },
}

#[derive(Debug, Deserialize)]
struct ArkeselEntry {
    recipient: String,
    #[serde(default)]
    id: Option<String>,
}

impl ArkeselGateway {
    /// Create a new Arkesel gateway client
    pub fn new(config: ArkeselConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| {
                InfrastructureError::Config(format!("Failed to build HTTP client: {}", e))
            })?;

        info!(base_url = %config.base_url, "Arkesel gateway initialized");
        Ok(Self { client, config })
    }
}

/// Turn a parsed provider response into per-recipient acceptance.
///
/// Recipients the provider did not echo back (or echoed without an id)
/// count as rejected. A batch-shaped response assigns the batch id to a
/// single recipient directly; with several recipients each gets a
/// `batch_id:recipient` composite so provider ids stay unique per message.
fn parse_acceptance(
    response: ArkeselResponse,
    recipients: &[String],
) -> Result<GatewayAcceptance, SmsError> {
    if response.status.as_deref() != Some("success") {
        return Err(SmsError::GatewayRejected {
            reason: response
                .message
                .unwrap_or_else(|| "provider reported failure".to_string()),
        });
    }

    let data = response.data.ok_or_else(|| SmsError::GatewayRejected {
        reason: "provider response carried no data".to_string(),
    })?;

    let accepted = match data {
        ArkeselData::PerRecipient(entries) => recipients
            .iter()
            .map(|recipient| {
                let provider_message_id = entries
                    .iter()
                    .find(|e| &e.recipient == recipient)
                    .and_then(|e| e.id.clone());
                RecipientAcceptance {
                    recipient: recipient.clone(),
                    provider_message_id,
                }
            })
            .collect(),
        ArkeselData::Batch { id } => {
            if recipients.len() == 1 {
                vec![RecipientAcceptance {
                    recipient: recipients[0].clone(),
                    provider_message_id: Some(id),
                }]
            } else {
                recipients
                    .iter()
                    .map(|recipient| RecipientAcceptance {
                        recipient: recipient.clone(),
                        provider_message_id: Some(format!("{}:{}", id, recipient)),
                    })
                    .collect()
            }
        }
    };

    Ok(GatewayAcceptance {
        recipients: accepted,
    })
}

#[async_trait]
impl SmsGateway for ArkeselGateway {
    async fn send(
        &self,
        sender: &str,
        body: &str,
        recipients: &[String],
        callback_url: &str,
    ) -> Result<GatewayAcceptance, SmsError> {
        let url = format!("{}/sms/send", self.config.base_url);
        let request = SendRequest {
            sender,
            message: body,
            recipients,
            callback_url,
        };

        debug!(
            recipients = recipients.len(),
            first = %recipients.first().map(|r| mask_phone(r)).unwrap_or_default(),
            "posting batch to Arkesel"
        );

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Arkesel request failed");
                SmsError::GatewayUnreachable {
                    reason: if e.is_timeout() {
                        "request timed out".to_string()
                    } else {
                        e.to_string()
                    },
                }
            })?;

        let http_status = response.status();
        let parsed: ArkeselResponse =
            response.json().await.map_err(|e| SmsError::GatewayRejected {
                reason: format!("unparseable provider response: {}", e),
            })?;

        if !http_status.is_success() {
            return Err(SmsError::GatewayRejected {
                reason: parsed
                    .message
                    .unwrap_or_else(|| format!("provider returned HTTP {}", http_status)),
            });
        }

        let acceptance = parse_acceptance(parsed, recipients)?;
        info!(
            accepted = acceptance.accepted_count(),
            total = recipients.len(),
            "Arkesel accepted batch"
        );
        Ok(acceptance)
    }

    fn provider_name(&self) -> &str {
        "Arkesel"
    }
}
