//! Handler for GET /api/v1/sms/history

use actix_web::{web, HttpResponse};

use sika_core::repositories::{AccountRepository, MessageRepository};
use sika_core::services::sms::gateway::SmsGateway;

use crate::app::AppState;
use crate::dto::sms::{HistoryResponse, MessageView, StatusCounts};
use crate::handlers::error::domain_error_response;
use crate::middleware::identity::AccountId;

/// All messages for the caller's account, newest first, with per-status
/// counts and the current balance. Delivery outcomes only become visible
/// here after the provider's webhook has reconciled each message.
pub async fn history<A, M, G>(
    account: AccountId,
    state: web::Data<AppState<A, M, G>>,
) -> HttpResponse
where
    A: AccountRepository + 'static,
    M: MessageRepository + 'static,
    G: SmsGateway + 'static,
{
    let messages = match state.messages.list_by_account(account.0).await {
        Ok(messages) => messages,
        Err(error) => return domain_error_response(&error),
    };
    let counts = match state.messages.status_counts(account.0).await {
        Ok(counts) => counts,
        Err(error) => return domain_error_response(&error),
    };
    let balance = match state.accounts.balance_of(account.0).await {
        Ok(balance) => balance,
        Err(error) => return domain_error_response(&error),
    };

    HttpResponse::Ok().json(HistoryResponse {
        messages: messages.iter().map(MessageView::from).collect(),
        counts: StatusCounts::from_pairs(&counts),
        balance,
    })
}
