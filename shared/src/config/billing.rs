//! SMS billing configuration
//!
//! The unit cost is process-wide configuration, not request-scoped. The
//! billing policy decides *when* the wallet is debited: at send time for
//! every recipient the provider accepts, or deferred until the provider
//! confirms delivery of each message.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::Money;

/// Default cost per SMS in minor units (GHS 0.05)
pub const DEFAULT_UNIT_COST_MINOR: i64 = 5;

/// When the prepaid balance is charged for a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPolicy {
    /// Debit the full batch cost when the provider accepts the send
    OnSend,
    /// Debit one unit cost per message when its delivery is confirmed
    OnDelivery,
}

impl FromStr for BillingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "on_send" | "send" => Ok(BillingPolicy::OnSend),
            "on_delivery" | "delivery" => Ok(BillingPolicy::OnDelivery),
            other => Err(format!("unknown billing policy: {}", other)),
        }
    }
}

/// Billing configuration for outbound SMS
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BillingConfig {
    /// Cost of a single SMS in minor units
    pub unit_cost: Money,

    /// When the wallet is debited
    pub policy: BillingPolicy,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            unit_cost: Money::from_minor(DEFAULT_UNIT_COST_MINOR),
            policy: BillingPolicy::OnDelivery,
        }
    }
}

impl BillingConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let unit_cost = std::env::var("SMS_UNIT_COST_MINOR")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Money::from_minor)
            .unwrap_or_else(|| Money::from_minor(DEFAULT_UNIT_COST_MINOR));
        let policy = std::env::var("SMS_BILLING_POLICY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(BillingPolicy::OnDelivery);

        Self { unit_cost, policy }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parsing() {
        assert_eq!("on_send".parse::<BillingPolicy>().unwrap(), BillingPolicy::OnSend);
        assert_eq!("ON_DELIVERY".parse::<BillingPolicy>().unwrap(), BillingPolicy::OnDelivery);
        assert!("sometimes".parse::<BillingPolicy>().is_err());
    }

    #[test]
    fn test_default_defers_billing() {
        let config = BillingConfig::default();
        assert_eq!(config.policy, BillingPolicy::OnDelivery);
        assert_eq!(config.unit_cost, Money::from_minor(DEFAULT_UNIT_COST_MINOR));
    }
}
