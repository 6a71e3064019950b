//! Handler for POST /api/v1/sms/send

use actix_web::{web, HttpResponse};
use validator::Validate;

use sika_core::repositories::{AccountRepository, MessageRepository};
use sika_core::services::sms::gateway::SmsGateway;
use sika_shared::types::ErrorResponse;
use sika_shared::utils::phone::mask_phone;

use crate::app::AppState;
use crate::dto::sms::{SendSmsRequest, SendSmsResponse};
use crate::handlers::error::domain_error_response;
use crate::middleware::identity::AccountId;

/// Send one message to one or more recipients.
///
/// # Request Body
///
/// ```json
/// {
///     "recipients": ["233241234567", "233549876543"],
///     "message": "Market day is Friday"
/// }
/// ```
///
/// `recipients` also accepts a single string. Responds 200 with the
/// accepted/rejected split and the new balance, 400 on validation
/// failures, 403 on insufficient balance, and 502 when the provider is
/// unreachable or rejects the batch.
pub async fn send<A, M, G>(
    account: AccountId,
    state: web::Data<AppState<A, M, G>>,
    request: web::Json<SendSmsRequest>,
) -> HttpResponse
where
    A: AccountRepository + 'static,
    M: MessageRepository + 'static,
    G: SmsGateway + 'static,
{
    let request = request.into_inner();
    if let Err(errors) = request.validate() {
        log::warn!("send request failed validation: {}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "VALIDATION_ERROR",
            "Invalid request data",
        ));
    }

    let recipients = request.recipients.into_vec();
    log::info!(
        "account {} sending to {} recipient(s), first: {}",
        account.0,
        recipients.len(),
        recipients.first().map(|r| mask_phone(r)).unwrap_or_default()
    );

    match state
        .send_service
        .send(account.0, &recipients, &request.message)
        .await
    {
        Ok(outcome) => HttpResponse::Ok().json(SendSmsResponse {
            message: "SMS dispatched".to_string(),
            accepted: outcome.messages.len(),
            rejected: outcome.rejected,
            new_balance: outcome.new_balance,
        }),
        Err(error) => {
            log::warn!("send failed for account {}: {}", account.0, error);
            domain_error_response(&error)
        }
    }
}
