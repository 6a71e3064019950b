//! Delivery-reconciliation tests: idempotence, billing trigger, clamping

use sika_shared::config::BillingPolicy;
use sika_shared::types::Money;

use crate::domain::entities::message::MessageStatus;
use crate::domain::value_objects::delivery_report::{DeliveryReport, ReportedStatus};
use crate::errors::DomainError;
use crate::repositories::account::AccountRepository;
use crate::services::sms::delivery::ReconcileOutcome;

use super::mocks::{fixture, Fixture, UNIT_COST};

fn report(provider_id: &str, status: ReportedStatus) -> DeliveryReport {
    DeliveryReport {
        provider_message_id: provider_id.to_string(),
        status,
    }
}

/// Send one batch through the fixture and return the provider ids
async fn seed_batch(fx: &Fixture, numbers: &[&str]) -> Vec<String> {
    let recipients: Vec<String> = numbers.iter().map(|s| s.to_string()).collect();
    let outcome = fx
        .send_service
        .send(fx.account_id, &recipients, "Market day is Friday")
        .await
        .unwrap();
    outcome
        .messages
        .iter()
        .map(|m| m.provider_message_id.clone().unwrap())
        .collect()
}

#[tokio::test]
async fn delivered_report_debits_one_unit_under_deferred_billing() {
    let fx = fixture(BillingPolicy::OnDelivery, Money::from_minor(1000)).await;
    let ids = seed_batch(&fx, &["233241234567", "233549876543", "233209999999"]).await;

    // Balance untouched by the send itself
    assert_eq!(
        fx.accounts.balance_of(fx.account_id).await.unwrap(),
        Money::from_minor(1000)
    );

    let outcome = fx
        .delivery_service
        .reconcile(&report(&ids[0], ReportedStatus::Delivered))
        .await
        .unwrap();

    match outcome {
        ReconcileOutcome::Applied(message) => {
            assert_eq!(message.status, MessageStatus::Delivered);
        }
        other => panic!("expected Applied, got {:?}", other),
    }
    assert_eq!(
        fx.accounts.balance_of(fx.account_id).await.unwrap(),
        Money::from_minor(900)
    );
}

#[tokio::test]
async fn duplicate_report_is_a_no_op_with_identical_state_and_balance() {
    let fx = fixture(BillingPolicy::OnDelivery, Money::from_minor(1000)).await;
    let ids = seed_batch(&fx, &["233241234567"]).await;

    fx.delivery_service
        .reconcile(&report(&ids[0], ReportedStatus::Delivered))
        .await
        .unwrap();
    let balance_after_first = fx.accounts.balance_of(fx.account_id).await.unwrap();
    let message_after_first = fx.messages.find_by_provider_id(&ids[0]).await.unwrap();

    // Provider redelivers the exact same callback
    let outcome = fx
        .delivery_service
        .reconcile(&report(&ids[0], ReportedStatus::Delivered))
        .await
        .unwrap();

    assert!(matches!(outcome, ReconcileOutcome::AlreadyProcessed(_)));
    assert_eq!(
        fx.accounts.balance_of(fx.account_id).await.unwrap(),
        balance_after_first
    );
    assert_eq!(
        fx.messages.find_by_provider_id(&ids[0]).await.unwrap(),
        message_after_first
    );
}

#[tokio::test]
async fn terminal_state_survives_later_conflicting_reports() {
    let fx = fixture(BillingPolicy::OnDelivery, Money::from_minor(1000)).await;
    let ids = seed_batch(&fx, &["233241234567"]).await;

    fx.delivery_service
        .reconcile(&report(&ids[0], ReportedStatus::Delivered))
        .await
        .unwrap();

    // An out-of-order "expired" report for the same message changes nothing
    let outcome = fx
        .delivery_service
        .reconcile(&report(&ids[0], ReportedStatus::Expired))
        .await
        .unwrap();
    assert!(matches!(outcome, ReconcileOutcome::AlreadyProcessed(_)));

    let message = fx.messages.find_by_provider_id(&ids[0]).await.unwrap();
    assert_eq!(message.status, MessageStatus::Delivered);
    assert_eq!(
        fx.accounts.balance_of(fx.account_id).await.unwrap(),
        Money::from_minor(900)
    );
}

#[tokio::test]
async fn failed_and_expired_reports_never_charge() {
    let fx = fixture(BillingPolicy::OnDelivery, Money::from_minor(1000)).await;
    let ids = seed_batch(&fx, &["233241234567", "233549876543"]).await;

    fx.delivery_service
        .reconcile(&report(&ids[0], ReportedStatus::Failed))
        .await
        .unwrap();
    fx.delivery_service
        .reconcile(&report(&ids[1], ReportedStatus::Expired))
        .await
        .unwrap();

    assert_eq!(
        fx.accounts.balance_of(fx.account_id).await.unwrap(),
        Money::from_minor(1000)
    );
    assert_eq!(
        fx.messages.find_by_provider_id(&ids[0]).await.unwrap().status,
        MessageStatus::Failed
    );
    assert_eq!(
        fx.messages.find_by_provider_id(&ids[1]).await.unwrap().status,
        MessageStatus::Expired
    );
}

#[tokio::test]
async fn send_time_billing_never_charges_again_on_delivery() {
    let fx = fixture(BillingPolicy::OnSend, Money::from_minor(1000)).await;
    let ids = seed_batch(&fx, &["233241234567"]).await;

    // Send already took the unit cost
    assert_eq!(
        fx.accounts.balance_of(fx.account_id).await.unwrap(),
        Money::from_minor(900)
    );

    fx.delivery_service
        .reconcile(&report(&ids[0], ReportedStatus::Delivered))
        .await
        .unwrap();

    assert_eq!(
        fx.accounts.balance_of(fx.account_id).await.unwrap(),
        Money::from_minor(900)
    );
}

#[tokio::test]
async fn aggregate_delivery_debits_equal_the_batch_cost() {
    let fx = fixture(BillingPolicy::OnDelivery, Money::from_minor(1000)).await;
    let ids = seed_batch(&fx, &["233241234567", "233549876543", "233209999999"]).await;

    for id in &ids {
        fx.delivery_service
            .reconcile(&report(id, ReportedStatus::Delivered))
            .await
            .unwrap();
    }

    let expected = Money::from_minor(1000)
        .checked_sub(UNIT_COST.checked_mul(ids.len()).unwrap())
        .unwrap();
    assert_eq!(
        fx.accounts.balance_of(fx.account_id).await.unwrap(),
        expected
    );
}

#[tokio::test]
async fn delivery_charge_is_clamped_at_zero() {
    // Opening balance covers the sufficiency check but a prior OnSend-less
    // drain leaves less than one unit at delivery time
    let fx = fixture(BillingPolicy::OnDelivery, Money::from_minor(100)).await;
    let ids = seed_batch(&fx, &["233241234567"]).await;

    // Wallet drained between send and delivery confirmation
    fx.accounts
        .debit(fx.account_id, Money::from_minor(97))
        .await
        .unwrap();

    fx.delivery_service
        .reconcile(&report(&ids[0], ReportedStatus::Delivered))
        .await
        .unwrap();

    assert_eq!(
        fx.accounts.balance_of(fx.account_id).await.unwrap(),
        Money::ZERO
    );
}

#[tokio::test]
async fn unknown_provider_id_is_not_found() {
    let fx = fixture(BillingPolicy::OnDelivery, Money::from_minor(1000)).await;

    let result = fx
        .delivery_service
        .reconcile(&report("never-seen", ReportedStatus::Delivered))
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}
