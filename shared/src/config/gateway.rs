//! SMS gateway configuration
//!
//! Settings for the outbound connection to the Arkesel bulk SMS API and
//! the callback URL the provider uses for delivery reports.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Default request timeout for gateway calls, in seconds
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 10;

/// Configuration for the external SMS gateway
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    /// Base URL of the provider API
    pub base_url: String,

    /// API key sent in the `api-key` header
    pub api_key: String,

    /// Publicly reachable URL the provider calls with delivery reports
    pub callback_url: String,

    /// Timeout for outbound gateway requests in seconds
    pub request_timeout_secs: u64,
}

impl GatewayConfig {
    /// Create configuration from environment variables
    ///
    /// `ARKESEL_API_KEY` is required; everything else has a sensible default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("ARKESEL_API_KEY")
            .map_err(|_| ConfigError::MissingVar("ARKESEL_API_KEY".to_string()))?;
        let base_url = std::env::var("ARKESEL_BASE_URL")
            .unwrap_or_else(|_| "https://sms.arkesel.com/api/v2".to_string());
        let callback_url = std::env::var("SMS_CALLBACK_URL")
            .unwrap_or_else(|_| "http://localhost:8080/api/v1/webhooks/delivery".to_string());
        let request_timeout_secs = std::env::var("GATEWAY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_GATEWAY_TIMEOUT_SECS);

        Ok(Self {
            base_url,
            api_key,
            callback_url,
            request_timeout_secs,
        })
    }
}
