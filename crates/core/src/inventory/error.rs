//! Inventory rule violations.

use thiserror::Error;

/// Errors raised by the stock rules before any write happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// The product is already sold.
    #[error("Product is already marked as sold")]
    AlreadySold,

    /// A sold product cannot be removed.
    #[error("Cannot delete a product that has been sold")]
    SoldProductNotDeletable,

    /// Price and quantity of a sold product are frozen.
    #[error("Cannot change the price or quantity of a sold product")]
    SoldProductFrozen,

    /// Asked to sell more than is in stock.
    #[error("Only {available} item(s) available")]
    InsufficientQuantity {
        /// Units in stock.
        available: i32,
        /// Units requested.
        requested: i32,
    },

    /// Sell quantity below one.
    #[error("Quantity to sell must be at least 1")]
    InvalidQuantity,

    /// The expense has products that were already sold.
    #[error(
        "This expense cannot be deleted because it has {0} related products that have been sold"
    )]
    SoldProductsExist(usize),

    /// A computed total exceeds the representable money range.
    #[error("Amount is too large")]
    AmountOutOfRange,
}

impl InventoryError {
    /// True for input problems as opposed to state conflicts.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InsufficientQuantity { .. } | Self::InvalidQuantity | Self::AmountOutOfRange
        )
    }
}
