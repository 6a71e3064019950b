//! Delivery report reconciliation.
//!
//! Providers redeliver callbacks, deliver them out of order, and deliver
//! them twice. The terminal-state check inside the repository transition is
//! what makes every replay a safe no-op; this service decides whether the
//! transition carries a billing charge.

use sika_shared::config::{BillingConfig, BillingPolicy};
use std::sync::Arc;

use crate::domain::value_objects::delivery_report::{DeliveryReport, ReportedStatus};
use crate::errors::DomainResult;
use crate::repositories::message::{MessageRepository, TransitionOutcome};

/// Result of reconciling one delivery report
#[derive(Debug, Clone)]
pub enum ReconcileOutcome {
    /// The report was applied to the message
    Applied(crate::domain::entities::message::Message),
    /// The message was already terminal; the report was ignored
    AlreadyProcessed(crate::domain::entities::message::Message),
}

/// Reconciles asynchronous delivery reports into message state
pub struct DeliveryReportService<M>
where
    M: MessageRepository,
{
    messages: Arc<M>,
    billing: BillingConfig,
}

impl<M> DeliveryReportService<M>
where
    M: MessageRepository,
{
    pub fn new(messages: Arc<M>, billing: BillingConfig) -> Self {
        Self { messages, billing }
    }

    /// Apply a delivery report to its message.
    ///
    /// Under deferred billing, the `delivered` transition is the billing
    /// trigger: the message's unit cost is debited (floored at zero) in the
    /// same transaction as the status flip, and only when the transition is
    /// actually applied.
    ///
    /// # Returns
    /// * `Ok(ReconcileOutcome)` - applied, or an idempotent no-op
    /// * `Err(DomainError::NotFound)` - unknown provider message id
    pub async fn reconcile(&self, report: &DeliveryReport) -> DomainResult<ReconcileOutcome> {
        let new_status = report.status.as_message_status();

        let charge = match (self.billing.policy, report.status) {
            (BillingPolicy::OnDelivery, ReportedStatus::Delivered) => Some(self.billing.unit_cost),
            _ => None,
        };

        let outcome = self
            .messages
            .transition_by_provider_id(&report.provider_message_id, new_status, charge)
            .await?;

        match outcome {
            TransitionOutcome::Applied(message) => {
                tracing::info!(
                    provider_message_id = %report.provider_message_id,
                    status = new_status.as_str(),
                    charged = charge.is_some(),
                    "delivery report applied"
                );
                Ok(ReconcileOutcome::Applied(message))
            }
            TransitionOutcome::AlreadyProcessed(message) => {
                tracing::info!(
                    provider_message_id = %report.provider_message_id,
                    current = message.status.as_str(),
                    "duplicate delivery report ignored"
                );
                Ok(ReconcileOutcome::AlreadyProcessed(message))
            }
        }
    }
}
