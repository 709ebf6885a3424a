//! The shopping platform aggregate.
//!
//! [`ShoppingPlatform`] owns every [`Shopper`] registered with it and is
//! the single entry point for the per-shopper operations a front end
//! needs. Failed lookups come back as [`LedgerError::NotFound`] rather
//! than panicking, so the caller decides whether to re-prompt or give up.

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::models::{DiscountRate, Shopper, ShopperId, ShopperKind};

/// Platform name used when none is configured.
pub const DEFAULT_PLATFORM_NAME: &str = "ShopSwift";

/// Half a cent. Totals are shown to two decimals, so a refund within this
/// of the current total is treated as refunding all of it.
const REFUND_TOLERANCE: f64 = 0.005;

/// Aggregate root owning an ordered collection of shoppers.
///
/// Shoppers keep their insertion order. Identifiers are not checked for
/// uniqueness: a duplicate is accepted and every lookup resolves to the
/// earliest shopper with that ID.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingPlatform {
    /// Display label.
    name: String,
    /// Registered shoppers in insertion order.
    shoppers: Vec<Shopper>,
}

/// Serializable read-only view of a platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSnapshot {
    /// Platform label.
    pub platform_name: String,
    /// Shoppers in insertion order.
    pub shoppers: Vec<Shopper>,
    /// Sum of all shoppers' spending.
    pub total_spending: f64,
}

impl PlatformSnapshot {
    /// Renders the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Serialization`] if encoding fails.
    #[inline]
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for ShoppingPlatform {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_PLATFORM_NAME)
    }
}

impl ShoppingPlatform {
    /// Creates an empty platform.
    #[inline]
    #[must_use]
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            shoppers: Vec::new(),
        }
    }

    /// Platform label.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered shoppers in insertion order.
    #[inline]
    #[must_use]
    pub fn shoppers(&self) -> &[Shopper] {
        &self.shoppers
    }

    /// Number of registered shoppers.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.shoppers.len()
    }

    /// Returns `true` if no shoppers are registered.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.shoppers.is_empty()
    }

    /// Appends a shopper.
    ///
    /// A shopper whose ID is already taken is still added, but it stays
    /// unreachable through ID lookups until the earlier one is removed.
    #[inline]
    pub fn add_shopper(&mut self, shopper: Shopper) {
        if self.position(shopper.id()).is_some() {
            tracing::warn!(
                shopper = %shopper.id(),
                "duplicate shopper ID; lookups resolve to the earlier shopper"
            );
        }
        tracing::debug!(shopper = %shopper.id(), kind = %shopper.kind(), "shopper added");
        self.shoppers.push(shopper);
    }

    /// Builds a shopper of the given kind, adds it, and returns its
    /// trimmed ID.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidInput`] if the name or ID is blank.
    #[inline]
    pub fn create_shopper(
        &mut self,
        name: &str,
        id: &str,
        kind: ShopperKind,
    ) -> Result<ShopperId> {
        let trimmed_name = name.trim();
        let trimmed_id = id.trim();
        if trimmed_name.is_empty() {
            return Err(LedgerError::InvalidInput(
                "shopper name must not be blank".to_owned(),
            ));
        }
        if trimmed_id.is_empty() {
            return Err(LedgerError::InvalidInput(
                "shopper ID must not be blank".to_owned(),
            ));
        }
        let id = ShopperId::from(trimmed_id);
        self.add_shopper(Shopper::new(trimmed_name, id.clone(), kind));
        Ok(id)
    }

    /// Removes the first shopper with the given ID and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if no shopper matches; the
    /// platform is left unchanged.
    #[inline]
    pub fn remove_shopper(&mut self, id: &ShopperId) -> Result<Shopper> {
        let index = self.position(id).ok_or_else(|| not_found(id))?;
        let removed = self.shoppers.remove(index);
        tracing::debug!(shopper = %id, "shopper removed");
        Ok(removed)
    }

    /// Looks up the first shopper with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if no shopper matches.
    #[inline]
    pub fn shopper(&self, id: &ShopperId) -> Result<&Shopper> {
        self.shoppers
            .iter()
            .find(|shopper| shopper.id() == id)
            .ok_or_else(|| not_found(id))
    }

    /// Looks up the first shopper with the given ID for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if no shopper matches.
    #[inline]
    pub fn shopper_mut(&mut self, id: &ShopperId) -> Result<&mut Shopper> {
        self.shoppers
            .iter_mut()
            .find(|shopper| shopper.id() == id)
            .ok_or_else(|| not_found(id))
    }

    /// Looks up the first shopper with the given ID and checks its variant.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if no shopper matches and
    /// [`LedgerError::WrongVariant`] if it is not of kind `expected`.
    #[inline]
    pub fn shopper_of_kind(&self, id: &ShopperId, expected: ShopperKind) -> Result<&Shopper> {
        let shopper = self.shopper(id)?;
        let actual = shopper.kind();
        if actual == expected {
            Ok(shopper)
        } else {
            Err(wrong_variant(id, expected, actual))
        }
    }

    /// Records a purchase and returns the shopper's new total.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] for an unknown ID and
    /// [`LedgerError::InvalidInput`] for a negative or non-finite amount.
    #[inline]
    pub fn make_purchase(&mut self, id: &ShopperId, amount: f64) -> Result<f64> {
        let shopper = self.shopper_mut(id)?;
        let _charged = shopper.make_purchase(amount)?;
        Ok(shopper.check_spending())
    }

    /// Refunds `amount` and returns the shopper's new total.
    ///
    /// Unlike [`Shopper::refund`], this refuses to refund more than the
    /// shopper has spent. Amounts are compared to the nearest cent: a
    /// refund within half a cent of the total clears it to exactly zero.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] for an unknown ID,
    /// [`LedgerError::InvalidInput`] for a negative or non-finite amount,
    /// and [`LedgerError::RefundExceedsSpending`] if `amount` is more than
    /// half a cent above the current total.
    #[inline]
    pub fn refund(&mut self, id: &ShopperId, amount: f64) -> Result<f64> {
        let shopper = self.shopper_mut(id)?;
        let available = shopper.check_spending();
        if amount - available > REFUND_TOLERANCE {
            return Err(LedgerError::RefundExceedsSpending {
                requested: amount,
                available,
            });
        }
        shopper.refund(amount)?;
        if (available - amount).abs() <= REFUND_TOLERANCE {
            shopper.settle();
        }
        Ok(shopper.check_spending())
    }

    /// Sets the discount coupon of a basic shopper.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] for an unknown ID and
    /// [`LedgerError::WrongVariant`] if the shopper is premium.
    #[inline]
    pub fn apply_discount(&mut self, id: &ShopperId, rate: DiscountRate) -> Result<()> {
        let shopper = self.shopper_mut(id)?;
        let actual = shopper.kind();
        let perks = shopper
            .basic_mut()
            .ok_or_else(|| wrong_variant(id, ShopperKind::Basic, actual))?;
        perks.set_discount_coupon(rate);
        tracing::debug!(shopper = %id, %rate, "discount coupon set");
        Ok(())
    }

    /// Removes the discount coupon of a basic shopper.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] for an unknown ID and
    /// [`LedgerError::WrongVariant`] if the shopper is premium.
    #[inline]
    pub fn clear_discount(&mut self, id: &ShopperId) -> Result<()> {
        let shopper = self.shopper_mut(id)?;
        let actual = shopper.kind();
        let perks = shopper
            .basic_mut()
            .ok_or_else(|| wrong_variant(id, ShopperKind::Basic, actual))?;
        perks.clear_discount_coupon();
        tracing::debug!(shopper = %id, "discount coupon cleared");
        Ok(())
    }

    /// Grants bonus points to a premium shopper and returns the new
    /// balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] for an unknown ID and
    /// [`LedgerError::WrongVariant`] if the shopper is basic.
    #[inline]
    pub fn add_bonus_points(&mut self, id: &ShopperId, points: u64) -> Result<u64> {
        let shopper = self.shopper_mut(id)?;
        let actual = shopper.kind();
        let perks = shopper
            .premium_mut()
            .ok_or_else(|| wrong_variant(id, ShopperKind::Premium, actual))?;
        let balance = perks.add_bonus_points(points);
        tracing::debug!(shopper = %id, points, balance, "bonus points granted");
        Ok(balance)
    }

    /// Current spending of one shopper.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if no shopper matches.
    #[inline]
    pub fn check_spending(&self, id: &ShopperId) -> Result<f64> {
        self.shopper(id).map(Shopper::check_spending)
    }

    /// Sum of every shopper's spending.
    #[inline]
    #[must_use]
    pub fn total_platform_spending(&self) -> f64 {
        self.shoppers.iter().map(Shopper::check_spending).sum()
    }

    /// Captures the current state for reporting.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> PlatformSnapshot {
        PlatformSnapshot {
            platform_name: self.name.clone(),
            shoppers: self.shoppers.clone(),
            total_spending: self.total_platform_spending(),
        }
    }

    /// Index of the first shopper with the given ID.
    fn position(&self, id: &ShopperId) -> Option<usize> {
        self.shoppers.iter().position(|shopper| shopper.id() == id)
    }
}

/// Builds a [`LedgerError::NotFound`] for `id`.
fn not_found(id: &ShopperId) -> LedgerError {
    LedgerError::NotFound { id: id.clone() }
}

/// Builds a [`LedgerError::WrongVariant`] for `id`.
fn wrong_variant(id: &ShopperId, expected: ShopperKind, actual: ShopperKind) -> LedgerError {
    LedgerError::WrongVariant {
        id: id.clone(),
        expected,
        actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> ShopperId {
        ShopperId::from(raw)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    /// Platform with one basic (`B1`) and one premium (`P1`) shopper.
    fn sample_platform() -> ShoppingPlatform {
        let mut platform = ShoppingPlatform::new("Test");
        platform.add_shopper(Shopper::new_basic("Ada", id("B1")));
        platform.add_shopper(Shopper::new_premium("Grace", id("P1")));
        platform
    }

    #[test]
    fn default_platform_is_named_and_empty() {
        let platform = ShoppingPlatform::default();
        assert_eq!(platform.name(), DEFAULT_PLATFORM_NAME);
        assert!(platform.is_empty());
        assert_close(platform.total_platform_spending(), 0.0);
    }

    #[test]
    fn add_preserves_insertion_order() {
        let platform = sample_platform();
        let ids: Vec<&str> = platform
            .shoppers()
            .iter()
            .map(|shopper| shopper.id().as_inner())
            .collect();
        assert_eq!(ids, ["B1", "P1"]);
        assert_eq!(platform.len(), 2);
    }

    #[test]
    fn basic_coupon_scenario() {
        let mut platform = sample_platform();
        platform
            .apply_discount(&id("B1"), DiscountRate::new(0.1).unwrap())
            .unwrap();
        let total = platform.make_purchase(&id("B1"), 100.0).unwrap();
        assert_close(total, 90.0);
    }

    #[test]
    fn premium_purchase_scenario() {
        let mut platform = sample_platform();
        let total = platform.make_purchase(&id("P1"), 50.0).unwrap();
        assert_close(total, 50.0);
        let points = platform
            .shopper(&id("P1"))
            .unwrap()
            .premium()
            .unwrap()
            .rewards_points();
        assert_eq!(points, 50);
    }

    #[test]
    fn remove_on_empty_platform_reports_not_found() {
        let mut platform = ShoppingPlatform::new("Empty");
        let err = platform.remove_shopper(&id("X1")).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { id } if id.as_inner() == "X1"));
        assert!(platform.is_empty());
    }

    #[test]
    fn purchase_on_unknown_id_leaves_total_unchanged() {
        let mut platform = sample_platform();
        let _total = platform.make_purchase(&id("B1"), 10.0).unwrap();
        let before = platform.total_platform_spending();
        let err = platform.make_purchase(&id("nobody"), 25.0).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
        assert_close(platform.total_platform_spending(), before);
    }

    #[test]
    fn remove_returns_the_shopper_and_drops_its_spending() {
        let mut platform = sample_platform();
        let _b = platform.make_purchase(&id("B1"), 40.0).unwrap();
        let _p = platform.make_purchase(&id("P1"), 60.0).unwrap();
        let removed = platform.remove_shopper(&id("B1")).unwrap();
        assert_eq!(removed.name(), "Ada");
        assert_eq!(platform.len(), 1);
        assert_close(platform.total_platform_spending(), 60.0);
        assert!(matches!(
            platform.check_spending(&id("B1")),
            Err(LedgerError::NotFound { .. })
        ));
    }

    #[test]
    fn total_is_independent_of_insertion_order() {
        let amounts = [("A", 12.25), ("B", 40.0), ("C", 7.75)];
        let mut forward = ShoppingPlatform::new("F");
        let mut backward = ShoppingPlatform::new("R");
        for &(raw, amount) in &amounts {
            let mut shopper = Shopper::new_basic(raw, id(raw));
            let _charged = shopper.make_purchase(amount).unwrap();
            forward.add_shopper(shopper);
        }
        for &(raw, amount) in amounts.iter().rev() {
            let mut shopper = Shopper::new_premium(raw, id(raw));
            let _charged = shopper.make_purchase(amount).unwrap();
            backward.add_shopper(shopper);
        }
        let expected: f64 = forward.shoppers().iter().map(Shopper::check_spending).sum();
        assert_close(forward.total_platform_spending(), expected);
        assert_close(backward.total_platform_spending(), expected);

        let _removed = forward.remove_shopper(&id("B")).unwrap();
        let _removed = backward.remove_shopper(&id("B")).unwrap();
        assert_close(forward.total_platform_spending(), 20.0);
        assert_close(backward.total_platform_spending(), 20.0);
    }

    #[test]
    fn discount_on_premium_is_wrong_variant() {
        let mut platform = sample_platform();
        let err = platform
            .apply_discount(&id("P1"), DiscountRate::new(0.2).unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::WrongVariant {
                expected: ShopperKind::Basic,
                actual: ShopperKind::Premium,
                ..
            }
        ));
        assert!(matches!(
            platform.clear_discount(&id("P1")),
            Err(LedgerError::WrongVariant { .. })
        ));
    }

    #[test]
    fn bonus_points_on_basic_is_wrong_variant() {
        let mut platform = sample_platform();
        let err = platform.add_bonus_points(&id("B1"), 10).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::WrongVariant {
                expected: ShopperKind::Premium,
                actual: ShopperKind::Basic,
                ..
            }
        ));
    }

    #[test]
    fn shopper_of_kind_checks_variant() {
        let platform = sample_platform();
        let found = platform
            .shopper_of_kind(&id("B1"), ShopperKind::Basic)
            .unwrap();
        assert_eq!(found.name(), "Ada");
        assert!(matches!(
            platform.shopper_of_kind(&id("B1"), ShopperKind::Premium),
            Err(LedgerError::WrongVariant { .. })
        ));
        assert!(matches!(
            platform.shopper_of_kind(&id("Z9"), ShopperKind::Premium),
            Err(LedgerError::NotFound { .. })
        ));
    }

    #[test]
    fn bonus_points_accumulate_with_purchase_points() {
        let mut platform = sample_platform();
        let _total = platform.make_purchase(&id("P1"), 19.9).unwrap();
        let balance = platform.add_bonus_points(&id("P1"), 100).unwrap();
        assert_eq!(balance, 119);
    }

    #[test]
    fn clear_discount_restores_full_price() {
        let mut platform = sample_platform();
        platform
            .apply_discount(&id("B1"), DiscountRate::new(0.5).unwrap())
            .unwrap();
        platform.clear_discount(&id("B1")).unwrap();
        let total = platform.make_purchase(&id("B1"), 30.0).unwrap();
        assert_close(total, 30.0);
    }

    #[test]
    fn refund_is_checked_against_spending() {
        let mut platform = sample_platform();
        let _total = platform.make_purchase(&id("B1"), 25.0).unwrap();
        let err = platform.refund(&id("B1"), 30.0).unwrap_err();
        assert!(matches!(err, LedgerError::RefundExceedsSpending { .. }));
        assert_close(platform.check_spending(&id("B1")).unwrap(), 25.0);

        let total = platform.refund(&id("B1"), 25.0).unwrap();
        assert_close(total, 0.0);
    }

    #[test]
    fn refund_of_displayed_total_clears_spending() {
        let mut platform = sample_platform();
        let _first = platform.make_purchase(&id("B1"), 0.7).unwrap();
        let shown = platform.make_purchase(&id("B1"), 0.1).unwrap();
        assert!(shown < 0.8);
        let total = platform.refund(&id("B1"), 0.8).unwrap();
        assert!(total.abs() < f64::EPSILON);
        assert!(platform.check_spending(&id("B1")).unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn refund_more_than_half_a_cent_over_is_refused() {
        let mut platform = sample_platform();
        let _total = platform.make_purchase(&id("B1"), 10.0).unwrap();
        assert!(matches!(
            platform.refund(&id("B1"), 10.01),
            Err(LedgerError::RefundExceedsSpending { .. })
        ));
        let total = platform.refund(&id("B1"), 9.999).unwrap();
        assert!(total.abs() < f64::EPSILON);
    }

    #[test]
    fn refund_rejects_negative_amount() {
        let mut platform = sample_platform();
        let _total = platform.make_purchase(&id("B1"), 25.0).unwrap();
        assert!(matches!(
            platform.refund(&id("B1"), -5.0),
            Err(LedgerError::InvalidInput(_))
        ));
    }

    #[test]
    fn duplicate_ids_resolve_to_first_shopper() {
        let mut platform = ShoppingPlatform::new("Dup");
        platform.add_shopper(Shopper::new_basic("First", id("D1")));
        platform.add_shopper(Shopper::new_premium("Second", id("D1")));
        assert_eq!(platform.len(), 2);
        assert_eq!(platform.shopper(&id("D1")).unwrap().name(), "First");

        let _removed = platform.remove_shopper(&id("D1")).unwrap();
        assert_eq!(platform.shopper(&id("D1")).unwrap().name(), "Second");
    }

    #[test]
    fn create_shopper_trims_and_validates() {
        let mut platform = ShoppingPlatform::new("Create");
        let created = platform
            .create_shopper("  Linus ", " L1 ", ShopperKind::Premium)
            .unwrap();
        assert_eq!(created.as_inner(), "L1");
        let shopper = platform.shopper(&created).unwrap();
        assert_eq!(shopper.name(), "Linus");
        assert_eq!(shopper.kind(), ShopperKind::Premium);

        assert!(matches!(
            platform.create_shopper("   ", "L2", ShopperKind::Basic),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(matches!(
            platform.create_shopper("Name", "", ShopperKind::Basic),
            Err(LedgerError::InvalidInput(_))
        ));
        assert_eq!(platform.len(), 1);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let mut platform = sample_platform();
        let _total = platform.make_purchase(&id("P1"), 12.0).unwrap();
        let snapshot = platform.snapshot();
        assert_close(snapshot.total_spending, 12.0);
        let json = snapshot.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["platformName"], "Test");
        assert_eq!(value["shoppers"][1]["tier"]["rewardsPoints"], 12);
        let decoded: PlatformSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, snapshot);
    }
}
