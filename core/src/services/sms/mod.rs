//! SMS send and delivery-reconciliation services.
//!
//! The send path: validate recipients, price the batch, check the wallet,
//! dispatch to the gateway, persist one message per accepted recipient.
//! The delivery path: reconcile asynchronous provider callbacks into
//! idempotent message state transitions with exactly-once billing.

pub mod cost;
pub mod delivery;
pub mod gateway;
pub mod send;

#[cfg(test)]
mod tests;

pub use cost::RateCard;
pub use delivery::{DeliveryReportService, ReconcileOutcome};
pub use gateway::{GatewayAcceptance, RecipientAcceptance, SmsGateway};
pub use send::{SendOutcome, SmsSendService};
