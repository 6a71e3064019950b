//! Caller identity extractor.
//!
//! Authentication happens upstream; by the time a request reaches this
//! service the auth layer has resolved the caller and installed their
//! account id in the `X-Account-Id` header. The extractor rejects
//! requests where the header is missing or malformed.

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use std::future::{ready, Ready};
use uuid::Uuid;

use sika_shared::types::ErrorResponse;

/// Header carrying the authenticated account id
pub const ACCOUNT_ID_HEADER: &str = "X-Account-Id";

/// The authenticated caller's account id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountId(pub Uuid);

impl FromRequest for AccountId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let account_id = req
            .headers()
            .get(ACCOUNT_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok());

        ready(match account_id {
            Some(id) => Ok(AccountId(id)),
            None => {
                let response = HttpResponse::Unauthorized().json(ErrorResponse::new(
                    "UNAUTHORIZED",
                    "Missing or invalid X-Account-Id header",
                ));
                Err(InternalError::from_response("unauthorized", response).into())
            }
        })
    }
}
