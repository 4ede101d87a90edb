//! Integer minor-unit money type.
//!
//! Monetary amounts are carried as whole cents so that sums and
//! per-line totals never accumulate floating-point drift. Formatting
//! goes through `rust_decimal` only at the display boundary.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in USD minor units (cents).
///
/// ```
/// use waggy_core::Money;
///
/// let unit = Money::from_cents(999);
/// let line = unit.times(2);
/// assert_eq!(line.as_cents(), 1998);
/// assert_eq!(line.to_string(), "$19.98");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Create a `Money` from a whole number of cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount in cents, the unit the payment processor expects.
    #[must_use]
    pub const fn as_cents(&self) -> i64 {
        self.0
    }

    /// Multiply a unit amount by a quantity, saturating at the i64 bounds.
    #[must_use]
    pub const fn times(self, quantity: i64) -> Self {
        Self(self.0.saturating_mul(quantity))
    }

    /// True when the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Decimal::new with scale 2 renders 3597 as "35.97".
        write!(f, "${}", Decimal::new(self.0, 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_cents() {
        assert_eq!(Money::from_cents(3597).to_string(), "$35.97");
        assert_eq!(Money::from_cents(900).to_string(), "$9.00");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_times() {
        assert_eq!(Money::from_cents(999).times(2), Money::from_cents(1998));
        assert_eq!(Money::from_cents(1599).times(1), Money::from_cents(1599));
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::from_cents(1998), Money::from_cents(1599)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_cents(3597));
    }

    #[test]
    fn test_times_saturates() {
        let big = Money::from_cents(i64::MAX);
        assert_eq!(big.times(2).as_cents(), i64::MAX);
    }
}
