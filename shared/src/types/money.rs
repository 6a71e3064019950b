//! Money represented in integer minor units.
//!
//! Balances and SMS prices are Ghana cedi amounts stored as pesewas
//! (1 GHS = 100 minor units). Integer arithmetic keeps wallet math exact;
//! float drift in balance accounting is not acceptable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A monetary amount in minor units (pesewas)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// The zero amount
    pub const ZERO: Money = Money(0);

    /// Create an amount from minor units
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// The amount in minor units
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Checked subtraction
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Subtraction floored at zero
    pub fn saturating_sub(self, other: Money) -> Money {
        Money((self.0 - other.0).max(0))
    }

    /// Multiply a unit amount by a count, e.g. unit cost x recipients
    pub fn checked_mul(self, count: usize) -> Option<Money> {
        let count = i64::try_from(count).ok()?;
        self.0.checked_mul(count).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GHS {}.{:02}", self.0 / 100, (self.0 % 100).abs())
    }
}
