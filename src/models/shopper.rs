//! Shopper account model.

use serde::{Deserialize, Serialize};

use super::{DiscountRate, ShopperId, ShopperKind};
use crate::error::{LedgerError, Result};

/// A shopper account tracking cumulative spending.
///
/// Purchase behavior depends on the [`Tier`]: basic shoppers may carry a
/// discount coupon, premium shoppers earn rewards points. Both variants
/// accumulate spending through the same primitive, so callers never have
/// to branch on the variant to make a purchase or a refund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shopper {
    /// Display name.
    name: String,
    /// Identifier within the owning platform.
    id: ShopperId,
    /// Cumulative spending.
    total_spending: f64,
    /// Variant-specific state.
    tier: Tier,
}

/// Variant-specific shopper state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Tier {
    /// Basic shopper with an optional discount coupon.
    Basic(BasicPerks),
    /// Premium shopper collecting rewards points.
    Premium(PremiumPerks),
}

/// State carried by a basic shopper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicPerks {
    /// Discount applied to every purchase while set.
    discount_coupon: Option<DiscountRate>,
}

/// State carried by a premium shopper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumPerks {
    /// Accumulated rewards points.
    rewards_points: u64,
}

/// Rejects amounts that are not finite or are negative.
fn checked_amount(amount: f64) -> Result<f64> {
    if amount.is_finite() && amount >= 0.0_f64 {
        Ok(amount)
    } else {
        Err(LedgerError::InvalidInput(format!(
            "amount must be a non-negative number, got {amount}"
        )))
    }
}

/// Whole currency units in `amount`, truncated toward zero.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "amount is validated finite and non-negative; float to int casts truncate and saturate"
)]
const fn whole_units(amount: f64) -> u64 {
    amount as u64
}

impl Shopper {
    /// Creates a shopper of the given kind with zero spending.
    #[inline]
    #[must_use]
    pub fn new<N: Into<String>>(name: N, id: ShopperId, kind: ShopperKind) -> Self {
        let tier = match kind {
            ShopperKind::Basic => Tier::Basic(BasicPerks::default()),
            ShopperKind::Premium => Tier::Premium(PremiumPerks::default()),
        };
        Self {
            name: name.into(),
            id,
            total_spending: 0.0_f64,
            tier,
        }
    }

    /// Creates a basic shopper without a coupon.
    #[inline]
    #[must_use]
    pub fn new_basic<N: Into<String>>(name: N, id: ShopperId) -> Self {
        Self::new(name, id, ShopperKind::Basic)
    }

    /// Creates a premium shopper with no points.
    #[inline]
    #[must_use]
    pub fn new_premium<N: Into<String>>(name: N, id: ShopperId) -> Self {
        Self::new(name, id, ShopperKind::Premium)
    }

    /// Display name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> &ShopperId {
        &self.id
    }

    /// Variant tag.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ShopperKind {
        match self.tier {
            Tier::Basic(_) => ShopperKind::Basic,
            Tier::Premium(_) => ShopperKind::Premium,
        }
    }

    /// Variant-specific state.
    #[inline]
    #[must_use]
    pub const fn tier(&self) -> &Tier {
        &self.tier
    }

    /// Records a purchase and returns the amount actually charged.
    ///
    /// Basic shoppers are charged the amount minus their coupon, if any.
    /// Premium shoppers are charged the full amount and then earn one
    /// point per whole unit of it.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidInput`] if `amount` is negative or not
    /// finite. Spending is left untouched in that case.
    #[inline]
    pub fn make_purchase(&mut self, amount: f64) -> Result<f64> {
        let requested = checked_amount(amount)?;
        let charged = match self.tier {
            Tier::Basic(perks) => perks.charge(requested),
            Tier::Premium(_) => requested,
        };
        self.accrue(charged);
        if let Some(perks) = self.premium_mut() {
            perks.earn(requested);
        }
        tracing::debug!(
            shopper = %self.id,
            requested,
            charged,
            total = self.total_spending,
            "purchase recorded"
        );
        Ok(charged)
    }

    /// Subtracts `amount` from the total spending.
    ///
    /// The result is not checked against the current total; see
    /// [`crate::platform::ShoppingPlatform::refund`] for the checked
    /// variant.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidInput`] if `amount` is negative or not
    /// finite.
    #[inline]
    pub fn refund(&mut self, amount: f64) -> Result<()> {
        let refunded = checked_amount(amount)?;
        self.accrue(-refunded);
        tracing::debug!(
            shopper = %self.id,
            refunded,
            total = self.total_spending,
            "refund recorded"
        );
        Ok(())
    }

    /// Current cumulative spending.
    #[inline]
    #[must_use]
    pub const fn check_spending(&self) -> f64 {
        self.total_spending
    }

    /// Basic-shopper state, if this is a basic shopper.
    #[inline]
    #[must_use]
    #[allow(
        clippy::pattern_type_mismatch,
        reason = "binds through the borrow since ref patterns are denied"
    )]
    pub const fn basic(&self) -> Option<&BasicPerks> {
        match &self.tier {
            Tier::Basic(perks) => Some(perks),
            Tier::Premium(_) => None,
        }
    }

    /// Premium-shopper state, if this is a premium shopper.
    #[inline]
    #[must_use]
    #[allow(
        clippy::pattern_type_mismatch,
        reason = "binds through the borrow since ref patterns are denied"
    )]
    pub const fn premium(&self) -> Option<&PremiumPerks> {
        match &self.tier {
            Tier::Premium(perks) => Some(perks),
            Tier::Basic(_) => None,
        }
    }

    /// Mutable basic-shopper state, if this is a basic shopper.
    #[inline]
    #[allow(
        clippy::pattern_type_mismatch,
        reason = "binds through the borrow since ref patterns are denied"
    )]
    pub const fn basic_mut(&mut self) -> Option<&mut BasicPerks> {
        match &mut self.tier {
            Tier::Basic(perks) => Some(perks),
            Tier::Premium(_) => None,
        }
    }

    /// Mutable premium-shopper state, if this is a premium shopper.
    #[inline]
    #[allow(
        clippy::pattern_type_mismatch,
        reason = "binds through the borrow since ref patterns are denied"
    )]
    pub const fn premium_mut(&mut self) -> Option<&mut PremiumPerks> {
        match &mut self.tier {
            Tier::Premium(perks) => Some(perks),
            Tier::Basic(_) => None,
        }
    }

    /// Drops the total back to exactly zero.
    pub(crate) const fn settle(&mut self) {
        self.total_spending = 0.0_f64;
    }

    /// Adds `delta` to the running total.
    fn accrue(&mut self, delta: f64) {
        self.total_spending += delta;
    }
}

impl BasicPerks {
    /// Current coupon, if any.
    #[inline]
    #[must_use]
    pub const fn discount_coupon(&self) -> Option<DiscountRate> {
        self.discount_coupon
    }

    /// Sets the coupon, replacing any previous one.
    #[inline]
    pub const fn set_discount_coupon(&mut self, rate: DiscountRate) {
        self.discount_coupon = Some(rate);
    }

    /// Removes the coupon.
    #[inline]
    pub const fn clear_discount_coupon(&mut self) {
        self.discount_coupon = None;
    }

    /// Amount charged for a purchase of `amount`.
    fn charge(self, amount: f64) -> f64 {
        self.discount_coupon
            .map_or(amount, |rate| rate.apply(amount))
    }
}

impl PremiumPerks {
    /// Accumulated rewards points.
    #[inline]
    #[must_use]
    pub const fn rewards_points(&self) -> u64 {
        self.rewards_points
    }

    /// Grants bonus points directly and returns the new balance.
    #[inline]
    pub const fn add_bonus_points(&mut self, points: u64) -> u64 {
        self.rewards_points = self.rewards_points.saturating_add(points);
        self.rewards_points
    }

    /// Credits the points earned by a purchase of `amount`.
    fn earn(&mut self, amount: f64) {
        self.rewards_points = self.rewards_points.saturating_add(whole_units(amount));
    }
}
