//! Business services

pub mod sms;

pub use sms::{
    DeliveryReportService, GatewayAcceptance, RateCard, ReconcileOutcome, RecipientAcceptance,
    SendOutcome, SmsGateway, SmsSendService,
};
