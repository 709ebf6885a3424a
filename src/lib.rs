//! In-memory shopper spending ledger.
//!
//! A [`platform::ShoppingPlatform`] owns a set of
//! [`models::Shopper`] accounts, each either basic (with an optional
//! persistent discount coupon) or premium (earning rewards points), and a
//! [`session::Session`] drives it through a numbered text menu.

pub mod error;
pub mod models;
pub mod platform;
pub mod session;
