//! Batch cost calculation.

use sika_shared::types::Money;

/// Process-wide SMS pricing
///
/// Pure arithmetic: `unit_cost x recipient_count`. Zero or invalid
/// recipient counts are rejected upstream by the send service.
#[derive(Debug, Clone, Copy)]
pub struct RateCard {
    unit_cost: Money,
}

impl RateCard {
    pub fn new(unit_cost: Money) -> Self {
        Self { unit_cost }
    }

    /// Cost of a single message
    pub fn unit_cost(&self) -> Money {
        self.unit_cost
    }

    /// Cost of a batch to `recipient_count` recipients
    pub fn batch_cost(&self, recipient_count: usize) -> Money {
        self.unit_cost
            .checked_mul(recipient_count)
            .unwrap_or(Money::from_minor(i64::MAX))
    }
}
