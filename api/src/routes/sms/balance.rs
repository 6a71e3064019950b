//! Handler for GET /api/v1/sms/balance

use actix_web::{web, HttpResponse};

use sika_core::repositories::{AccountRepository, MessageRepository};
use sika_core::services::sms::gateway::SmsGateway;

use crate::app::AppState;
use crate::dto::sms::BalanceResponse;
use crate::handlers::error::domain_error_response;
use crate::middleware::identity::AccountId;

/// Current prepaid SMS balance for the caller's account
pub async fn balance<A, M, G>(
    account: AccountId,
    state: web::Data<AppState<A, M, G>>,
) -> HttpResponse
where
    A: AccountRepository + 'static,
    M: MessageRepository + 'static,
    G: SmsGateway + 'static,
{
    match state.accounts.balance_of(account.0).await {
        Ok(balance) => HttpResponse::Ok().json(BalanceResponse { balance }),
        Err(error) => domain_error_response(&error),
    }
}
