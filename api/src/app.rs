//! Application state and route configuration
//!
//! The state is generic over the repository and gateway implementations so
//! the same wiring serves production (MySQL + Arkesel) and tests (mocks).

use std::sync::Arc;

use actix_web::{web, HttpResponse};

use sika_core::repositories::{AccountRepository, MessageRepository};
use sika_core::services::sms::delivery::DeliveryReportService;
use sika_core::services::sms::gateway::SmsGateway;
use sika_core::services::sms::send::SmsSendService;
use sika_shared::config::BillingConfig;

/// Shared application state holding the wired services
pub struct AppState<A, M, G>
where
    A: AccountRepository,
    M: MessageRepository,
    G: SmsGateway,
{
    pub send_service: Arc<SmsSendService<A, M, G>>,
    pub delivery_service: Arc<DeliveryReportService<M>>,
    pub accounts: Arc<A>,
    pub messages: Arc<M>,
}

impl<A, M, G> AppState<A, M, G>
where
    A: AccountRepository,
    M: MessageRepository,
    G: SmsGateway,
{
    /// Wire the services over the given repositories and gateway
    pub fn new(
        accounts: Arc<A>,
        messages: Arc<M>,
        gateway: Arc<G>,
        billing: BillingConfig,
        callback_url: String,
    ) -> Self {
        let send_service = Arc::new(SmsSendService::new(
            accounts.clone(),
            messages.clone(),
            gateway,
            billing,
            callback_url,
        ));
        let delivery_service = Arc::new(DeliveryReportService::new(messages.clone(), billing));

        Self {
            send_service,
            delivery_service,
            accounts,
            messages,
        }
    }
}

/// Register all routes on the service config
pub fn configure<A, M, G>(cfg: &mut web::ServiceConfig)
where
    A: AccountRepository + 'static,
    M: MessageRepository + 'static,
    G: SmsGateway + 'static,
{
    use crate::routes::sms::{balance::balance, history::history, send::send};
    use crate::routes::webhooks::delivery::{receive_get, receive_post};

    cfg.route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/sms")
                        .route("/send", web::post().to(send::<A, M, G>))
                        .route("/history", web::get().to(history::<A, M, G>))
                        .route("/balance", web::get().to(balance::<A, M, G>)),
                )
                .service(
                    web::scope("/webhooks")
                        .route("/delivery", web::get().to(receive_get::<A, M, G>))
                        .route("/delivery", web::post().to(receive_post::<A, M, G>)),
                ),
        )
        .default_service(web::route().to(not_found));
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "sika-sms-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
