//! Discount coupon rate.

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

/// A discount fraction in `[0, 1)`.
///
/// A rate of `0.1` takes 10% off every purchase. Construction and
/// deserialization both reject values outside the range, so a stored rate
/// can never turn a purchase into a credit.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct DiscountRate(f64);

impl DiscountRate {
    /// Creates a rate after checking it lies in `[0, 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidInput`] for non-finite values and
    /// values outside the range.
    #[inline]
    pub fn new(rate: f64) -> Result<Self> {
        if rate.is_finite() && (0.0_f64..1.0_f64).contains(&rate) {
            Ok(Self(rate))
        } else {
            Err(LedgerError::InvalidInput(format!(
                "discount rate must be at least 0 and below 1, got {rate}"
            )))
        }
    }

    /// Returns the raw fraction.
    #[inline]
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Returns `amount` with the discount taken off.
    #[inline]
    #[must_use]
    pub fn apply(self, amount: f64) -> f64 {
        amount * (1.0_f64 - self.0)
    }
}

impl TryFrom<f64> for DiscountRate {
    type Error = LedgerError;

    #[inline]
    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<DiscountRate> for f64 {
    #[inline]
    fn from(rate: DiscountRate) -> Self {
        rate.0
    }
}

impl core::fmt::Display for DiscountRate {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let percent = (self.0 * 10_000.0_f64).round() / 100.0_f64;
        write!(f, "{percent}%")
    }
}
