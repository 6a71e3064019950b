//! Mock SMS gateway for tests and local development.
//!
//! Records every request and answers with scripted outcomes; with nothing
//! scripted it accepts every recipient under a deterministic provider id.

use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::Mutex;

use sika_core::errors::SmsError;
use sika_core::services::sms::gateway::{GatewayAcceptance, RecipientAcceptance, SmsGateway};

/// A request the mock gateway received
#[derive(Debug, Clone)]
pub struct RecordedSend {
    pub sender: String,
    pub body: String,
    pub recipients: Vec<String>,
    pub callback_url: String,
}

/// Mock gateway implementation
pub struct MockGateway {
    sent: Mutex<Vec<RecordedSend>>,
    failures: Mutex<VecDeque<SmsError>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failures: Mutex::new(VecDeque::new()),
        }
    }

    /// Script a failure for the next send call
    pub async fn fail_next(&self, error: SmsError) {
        self.failures.lock().await.push_back(error);
    }

    /// All requests received so far
    pub async fn sent(&self) -> Vec<RecordedSend> {
        self.sent.lock().await.clone()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsGateway for MockGateway {
    async fn send(
        &self,
        sender: &str,
        body: &str,
        recipients: &[String],
        callback_url: &str,
    ) -> Result<GatewayAcceptance, SmsError> {
        self.sent.lock().await.push(RecordedSend {
            sender: sender.to_string(),
            body: body.to_string(),
            recipients: recipients.to_vec(),
            callback_url: callback_url.to_string(),
        });

        if let Some(error) = self.failures.lock().await.pop_front() {
            return Err(error);
        }

        Ok(GatewayAcceptance {
            recipients: recipients
                .iter()
                .map(|r| RecipientAcceptance {
                    recipient: r.clone(),
                    provider_message_id: Some(format!("mock-{}", r)),
                })
                .collect(),
        })
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_accepts_all_by_default() {
        let gateway = MockGateway::new();
        let acceptance = gateway
            .send(
                "Shop",
                "hello",
                &["233241234567".to_string()],
                "http://localhost/cb",
            )
            .await
            .unwrap();

        assert_eq!(acceptance.accepted_count(), 1);
        assert_eq!(
            acceptance.recipients[0].provider_message_id.as_deref(),
            Some("mock-233241234567")
        );
        assert_eq!(gateway.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let gateway = MockGateway::new();
        gateway
            .fail_next(SmsError::GatewayUnreachable {
                reason: "down".to_string(),
            })
            .await;

        let result = gateway
            .send(
                "Shop",
                "hello",
                &["233241234567".to_string()],
                "http://localhost/cb",
            )
            .await;
        assert!(matches!(result, Err(SmsError::GatewayUnreachable { .. })));

        // Next call succeeds again
        let result = gateway
            .send(
                "Shop",
                "hello",
                &["233241234567".to_string()],
                "http://localhost/cb",
            )
            .await;
        assert!(result.is_ok());
    }
}
