//! Error types for the shopper ledger.

use crate::models::{ShopperId, ShopperKind};

/// All errors that can occur when operating the ledger.
///
/// Every variant is recoverable: the caller reports it and carries on.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// No shopper with the given identifier is registered.
    #[error("shopper {id} not found")]
    NotFound {
        /// Identifier that failed to resolve.
        id: ShopperId,
    },

    /// The shopper exists but is of the other variant.
    #[error("shopper {id} is a {actual} shopper, not a {expected} shopper")]
    WrongVariant {
        /// Identifier of the resolved shopper.
        id: ShopperId,
        /// Variant the operation requires.
        expected: ShopperKind,
        /// Variant the shopper actually has.
        actual: ShopperKind,
    },

    /// Malformed or out-of-range input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A refund larger than the shopper's recorded spending.
    #[error("refund of {requested:.2} exceeds total spending of {available:.2}")]
    RefundExceedsSpending {
        /// Amount the caller asked to refund.
        requested: f64,
        /// Spending recorded for the shopper at the time of the request.
        available: f64,
    },

    /// JSON serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias for results produced by this crate.
pub type Result<T> = core::result::Result<T, LedgerError>;
