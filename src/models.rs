//! Data models for the shopper ledger.
//!
//! This module contains the shopper entity with its basic and premium
//! variants, the identifier newtype, and the validated discount rate.

mod coupon;
mod enums;
mod ids;
mod shopper;

pub use coupon::DiscountRate;
pub use enums::ShopperKind;
pub use ids::ShopperId;
pub use shopper::{BasicPerks, PremiumPerks, Shopper, Tier};
