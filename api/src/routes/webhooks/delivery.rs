//! Delivery-report webhook from the SMS provider.
//!
//! Registered for both GET (query parameters) and POST (JSON body, with
//! query parameters as fallback). The acknowledgment is about receipt,
//! not outcome: a structurally valid report is answered 200 whether the
//! reported status is delivered, failed or expired, and whether or not it
//! was a duplicate. Only missing fields (400), unknown ids (404) and
//! internal failures (500, which make the provider retry) differ.

use actix_web::{web, HttpResponse};
use serde_json::json;

use sika_core::repositories::{AccountRepository, MessageRepository};
use sika_core::services::sms::delivery::ReconcileOutcome;
use sika_core::services::sms::gateway::SmsGateway;
use sika_core::errors::DomainError;

use crate::app::AppState;
use crate::dto::webhook::DeliveryReportParams;
use crate::handlers::error::domain_error_response;

async fn process<A, M, G>(
    state: &AppState<A, M, G>,
    params: DeliveryReportParams,
) -> HttpResponse
where
    A: AccountRepository + 'static,
    M: MessageRepository + 'static,
    G: SmsGateway + 'static,
{
    let report = match params.normalize() {
        Ok(report) => report,
        Err(error) => {
            log::warn!("rejecting delivery report: {}", error);
            return domain_error_response(&error.into());
        }
    };

    match state.delivery_service.reconcile(&report).await {
        Ok(ReconcileOutcome::Applied(message)) => HttpResponse::Ok().json(json!({
            "message": "delivery report processed",
            "status": message.status.as_str(),
        })),
        Ok(ReconcileOutcome::AlreadyProcessed(message)) => HttpResponse::Ok().json(json!({
            "message": "already processed",
            "status": message.status.as_str(),
        })),
        Err(error @ DomainError::NotFound { .. }) => {
            log::warn!(
                "delivery report for unknown provider id {}",
                report.provider_message_id
            );
            domain_error_response(&error)
        }
        Err(error) => {
            log::error!("delivery report reconciliation failed: {}", error);
            domain_error_response(&error)
        }
    }
}

/// GET variant: fields arrive as query parameters
pub async fn receive_get<A, M, G>(
    state: web::Data<AppState<A, M, G>>,
    query: web::Query<DeliveryReportParams>,
) -> HttpResponse
where
    A: AccountRepository + 'static,
    M: MessageRepository + 'static,
    G: SmsGateway + 'static,
{
    process(&state, query.into_inner()).await
}

/// POST variant: fields arrive as a JSON body, or as query parameters
/// when the provider posts with an empty body
pub async fn receive_post<A, M, G>(
    state: web::Data<AppState<A, M, G>>,
    query: web::Query<DeliveryReportParams>,
    body: Option<web::Json<DeliveryReportParams>>,
) -> HttpResponse
where
    A: AccountRepository + 'static,
    M: MessageRepository + 'static,
    G: SmsGateway + 'static,
{
    let params = match body {
        Some(body) => body.into_inner(),
        None => query.into_inner(),
    };
    process(&state, params).await
}
