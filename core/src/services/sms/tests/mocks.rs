//! Scriptable gateway mock and shared fixtures for service tests

use async_trait::async_trait;
use sika_shared::config::{BillingConfig, BillingPolicy};
use sika_shared::types::Money;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::entities::account::Account;
use crate::errors::SmsError;
use crate::repositories::account::MockAccountRepository;
use crate::repositories::message::MockMessageRepository;
use crate::services::sms::delivery::DeliveryReportService;
use crate::services::sms::gateway::{GatewayAcceptance, RecipientAcceptance, SmsGateway};
use crate::services::sms::send::SmsSendService;

/// A recorded gateway call
#[derive(Debug, Clone)]
pub struct SentBatch {
    pub sender: String,
    pub body: String,
    pub recipients: Vec<String>,
}

/// What the mock gateway should answer next
pub enum ScriptedOutcome {
    /// Accept every recipient with a generated provider id
    AcceptAll,
    /// Return exactly this acceptance
    Acceptance(GatewayAcceptance),
    /// Transport failure
    Unreachable,
    /// Provider-level batch rejection
    Rejected,
}

/// Scriptable SMS gateway; accepts everything unless told otherwise
pub struct MockGateway {
    outcomes: Mutex<VecDeque<ScriptedOutcome>>,
    calls: Mutex<Vec<SentBatch>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub async fn script(&self, outcome: ScriptedOutcome) {
        self.outcomes.lock().await.push_back(outcome);
    }

    pub async fn calls(&self) -> Vec<SentBatch> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl SmsGateway for MockGateway {
    async fn send(
        &self,
        sender: &str,
        body: &str,
        recipients: &[String],
        _callback_url: &str,
    ) -> Result<GatewayAcceptance, SmsError> {
        self.calls.lock().await.push(SentBatch {
            sender: sender.to_string(),
            body: body.to_string(),
            recipients: recipients.to_vec(),
        });

        let outcome = self
            .outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or(ScriptedOutcome::AcceptAll);

        match outcome {
            ScriptedOutcome::AcceptAll => Ok(GatewayAcceptance {
                recipients: recipients
                    .iter()
                    .map(|r| RecipientAcceptance {
                        recipient: r.clone(),
                        provider_message_id: Some(format!("mock-{}", r)),
                    })
                    .collect(),
            }),
            ScriptedOutcome::Acceptance(acceptance) => Ok(acceptance),
            ScriptedOutcome::Unreachable => Err(SmsError::GatewayUnreachable {
                reason: "connection timed out".to_string(),
            }),
            ScriptedOutcome::Rejected => Err(SmsError::GatewayRejected {
                reason: "invalid api key".to_string(),
            }),
        }
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}

/// Everything a service test needs, wired over shared mock stores
pub struct Fixture {
    pub accounts: Arc<MockAccountRepository>,
    pub messages: Arc<MockMessageRepository>,
    pub gateway: Arc<MockGateway>,
    pub send_service: SmsSendService<MockAccountRepository, MockMessageRepository, MockGateway>,
    pub delivery_service: DeliveryReportService<MockMessageRepository>,
    pub account_id: uuid::Uuid,
}

/// Unit cost used by all fixtures: GHS 1.00
pub const UNIT_COST: Money = Money::from_minor(100);

pub async fn fixture(policy: BillingPolicy, opening_balance: Money) -> Fixture {
    let billing = BillingConfig {
        unit_cost: UNIT_COST,
        policy,
    };

    let accounts = Arc::new(MockAccountRepository::new());
    let account = Account::with_balance("Kofi Stores".to_string(), opening_balance);
    let account_id = account.id;
    accounts.insert(account).await;

    let messages = Arc::new(MockMessageRepository::with_ledger(accounts.clone()));
    let gateway = Arc::new(MockGateway::new());

    let send_service = SmsSendService::new(
        accounts.clone(),
        messages.clone(),
        gateway.clone(),
        billing,
        "http://localhost:8080/api/v1/webhooks/delivery".to_string(),
    );
    let delivery_service = DeliveryReportService::new(messages.clone(), billing);

    Fixture {
        accounts,
        messages,
        gateway,
        send_service,
        delivery_service,
        account_id,
    }
}
