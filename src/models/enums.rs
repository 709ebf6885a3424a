//! Enumeration types for constrained ledger values.

use serde::{Deserialize, Serialize};

/// Variant tag of a shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShopperKind {
    /// Pays with an optional persistent discount coupon.
    Basic,
    /// Earns one rewards point per whole currency unit spent.
    Premium,
}

impl ShopperKind {
    /// Lowercase label used in messages.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Premium => "premium",
        }
    }
}

impl core::fmt::Display for ShopperKind {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
