//! Derivation rules for products and sales.

use chrono::NaiveDate;
use fintools_shared::types::{ExpenseCategory, ProductCategory, RevenueCategory};
use rust_decimal::Decimal;

use super::InventoryError;

// ============================================================================
// Auto-asset rule
// ============================================================================

/// Resolves an expense's `is_asset` flag.
///
/// An explicit value wins; otherwise stock categories (Phone, Accessories)
/// default to assets.
#[must_use]
pub fn effective_is_asset(category: ExpenseCategory, explicit: Option<bool>) -> bool {
    explicit.unwrap_or_else(|| category.is_stock())
}

/// Whether an expense with these attributes gets a product created for it.
#[must_use]
pub const fn spawns_product(category: ExpenseCategory, is_asset: bool) -> bool {
    is_asset && category.is_stock()
}

/// Book value of a stock line.
///
/// # Errors
///
/// Returns `AmountOutOfRange` when the product does not fit a `Decimal`.
pub fn asset_value(purchase_price: Decimal, quantity: i32) -> Result<Decimal, InventoryError> {
    purchase_price
        .checked_mul(Decimal::from(quantity))
        .ok_or(InventoryError::AmountOutOfRange)
}

/// Fields of a product derived from an expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub category: ProductCategory,
    pub purchase_price: Decimal,
    pub quantity: i32,
    pub asset_value: Decimal,
    pub purchase_date: NaiveDate,
}

impl ProductDraft {
    /// The single product the auto-asset rule creates for an expense.
    #[must_use]
    pub fn from_expense(
        description: &str,
        amount: Decimal,
        category: ExpenseCategory,
        date: NaiveDate,
    ) -> Self {
        Self {
            name: description.to_string(),
            description: format!("Product from expense: {description}"),
            category: category.into(),
            purchase_price: amount,
            quantity: 1,
            asset_value: amount,
            purchase_date: date,
        }
    }

    /// A product bought with an expense, `quantity` units at `amount` each.
    ///
    /// # Errors
    ///
    /// Returns `AmountOutOfRange` when the total value overflows.
    pub fn from_expense_with_quantity(
        description: &str,
        amount: Decimal,
        category: ExpenseCategory,
        date: NaiveDate,
        quantity: i32,
    ) -> Result<Self, InventoryError> {
        Ok(Self {
            quantity,
            asset_value: asset_value(amount, quantity)?,
            ..Self::from_expense(description, amount, category, date)
        })
    }
}

// ============================================================================
// Sales
// ============================================================================

/// The parts of a product that matter for selling it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLine {
    pub quantity: i32,
    pub asset_value: Decimal,
    pub in_stock: bool,
}

/// How a sale changes a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalePlan {
    /// Every unit sold; the record itself becomes the sold record.
    Full {
        /// Units sold (the whole quantity).
        quantity: i32,
    },
    /// Some units sold; the record keeps the rest and a new sold record is split off.
    Split {
        /// Units left on the original record.
        remaining: i32,
        /// Pro-rated value left on the original record.
        remaining_value: Decimal,
        /// Units on the new sold record.
        sold: i32,
        /// Pro-rated value of the new sold record.
        sold_value: Decimal,
    },
}

impl SalePlan {
    /// Units leaving stock.
    #[must_use]
    pub const fn quantity_sold(&self) -> i32 {
        match self {
            Self::Full { quantity } => *quantity,
            Self::Split { sold, .. } => *sold,
        }
    }
}

/// Decides how selling `requested` units (all of them when `None`) changes
/// the product.
///
/// # Errors
///
/// - `AlreadySold` if the line is no longer in stock.
/// - `InvalidQuantity` if fewer than one unit is requested.
/// - `InsufficientQuantity` if more units are requested than exist.
pub fn plan_sale(line: &StockLine, requested: Option<i32>) -> Result<SalePlan, InventoryError> {
    if !line.in_stock {
        return Err(InventoryError::AlreadySold);
    }

    let requested = requested.unwrap_or(line.quantity);
    if requested < 1 {
        return Err(InventoryError::InvalidQuantity);
    }
    if requested > line.quantity {
        return Err(InventoryError::InsufficientQuantity {
            available: line.quantity,
            requested,
        });
    }

    let remaining = line.quantity - requested;
    if remaining == 0 {
        return Ok(SalePlan::Full {
            quantity: requested,
        });
    }

    let unit_value = line.asset_value / Decimal::from(line.quantity);
    Ok(SalePlan::Split {
        remaining,
        remaining_value: unit_value * Decimal::from(remaining),
        sold: requested,
        sold_value: unit_value * Decimal::from(requested),
    })
}

/// Fields of the revenue booked by a sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueDraft {
    pub description: String,
    pub amount: Decimal,
    pub category: RevenueCategory,
    pub date: NaiveDate,
    pub notes: String,
}

impl RevenueDraft {
    /// Revenue for selling `quantity` units of `product_name` at `selling_price` each.
    ///
    /// # Errors
    ///
    /// Returns `AmountOutOfRange` when the sale total overflows.
    pub fn for_sale(
        product_name: &str,
        selling_price: Decimal,
        quantity: i32,
        sold_date: NaiveDate,
        notes: Option<&str>,
    ) -> Result<Self, InventoryError> {
        let amount = selling_price
            .checked_mul(Decimal::from(quantity))
            .ok_or(InventoryError::AmountOutOfRange)?;
        Ok(Self {
            description: format!("Sale of {quantity} {product_name}"),
            amount,
            category: RevenueCategory::Sales,
            date: sold_date,
            notes: notes
                .filter(|n| !n.is_empty())
                .map_or_else(|| format!("Revenue from selling {product_name}"), str::to_string),
        })
    }
}

// ============================================================================
// Guards
// ============================================================================

/// Checks that none of an expense's products has been sold.
///
/// `in_stock` holds one flag per related product.
///
/// # Errors
///
/// Returns `SoldProductsExist` with the number of sold products.
pub fn ensure_expense_deletable(in_stock: &[bool]) -> Result<(), InventoryError> {
    let sold = in_stock.iter().filter(|s| !**s).count();
    if sold > 0 {
        return Err(InventoryError::SoldProductsExist(sold));
    }
    Ok(())
}

/// # Errors
///
/// Returns `SoldProductNotDeletable` for sold products.
pub const fn ensure_product_deletable(in_stock: bool) -> Result<(), InventoryError> {
    if in_stock {
        Ok(())
    } else {
        Err(InventoryError::SoldProductNotDeletable)
    }
}

/// Checks an update against a product's sale state.
///
/// # Errors
///
/// Returns `SoldProductFrozen` when a sold product's price or quantity would change.
pub const fn ensure_product_editable(
    in_stock: bool,
    touches_price_or_quantity: bool,
) -> Result<(), InventoryError> {
    if !in_stock && touches_price_or_quantity {
        return Err(InventoryError::SoldProductFrozen);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[rstest]
    #[case(ExpenseCategory::Phone, None, true)]
    #[case(ExpenseCategory::Accessories, None, true)]
    #[case(ExpenseCategory::Phone, Some(false), false)]
    #[case(ExpenseCategory::Rental, None, false)]
    #[case(ExpenseCategory::Equipment, Some(true), true)]
    fn test_effective_is_asset(
        #[case] category: ExpenseCategory,
        #[case] explicit: Option<bool>,
        #[case] expected: bool,
    ) {
        assert_eq!(effective_is_asset(category, explicit), expected);
    }

    #[test]
    fn test_only_stock_categories_spawn_products() {
        assert!(spawns_product(ExpenseCategory::Phone, true));
        assert!(!spawns_product(ExpenseCategory::Phone, false));
        // An asset, but not stock.
        assert!(!spawns_product(ExpenseCategory::Equipment, true));
    }

    #[test]
    fn test_product_draft_from_expense() {
        let draft =
            ProductDraft::from_expense("iPhone 13", dec!(2500), ExpenseCategory::Phone, date());
        assert_eq!(draft.name, "iPhone 13");
        assert_eq!(draft.description, "Product from expense: iPhone 13");
        assert_eq!(draft.category, ProductCategory::Phone);
        assert_eq!(draft.quantity, 1);
        assert_eq!(draft.asset_value, dec!(2500));
        assert_eq!(draft.purchase_date, date());

        let boxed = ProductDraft::from_expense_with_quantity(
            "Cases",
            dec!(12.5),
            ExpenseCategory::Accessories,
            date(),
            4,
        )
        .unwrap();
        assert_eq!(boxed.quantity, 4);
        assert_eq!(boxed.asset_value, dec!(50));
        assert_eq!(boxed.name, "Cases");
    }

    #[test]
    fn test_oversized_amounts_rejected() {
        let huge = Decimal::MAX / dec!(2);
        assert_eq!(asset_value(huge, 3), Err(InventoryError::AmountOutOfRange));
        assert_eq!(
            RevenueDraft::for_sale("Phone", dec!(40000000000000000000000000000), 2, date(), None),
            Err(InventoryError::AmountOutOfRange)
        );
        let draft = ProductDraft::from_expense_with_quantity(
            "Phone",
            huge,
            ExpenseCategory::Phone,
            date(),
            3,
        );
        assert_eq!(draft, Err(InventoryError::AmountOutOfRange));
        assert!(InventoryError::AmountOutOfRange.is_validation());
    }

    #[test]
    fn test_full_sale() {
        let line = StockLine {
            quantity: 3,
            asset_value: dec!(300),
            in_stock: true,
        };
        assert_eq!(plan_sale(&line, None), Ok(SalePlan::Full { quantity: 3 }));
        assert_eq!(plan_sale(&line, Some(3)), Ok(SalePlan::Full { quantity: 3 }));
    }

    #[test]
    fn test_partial_sale_prorates_value() {
        let line = StockLine {
            quantity: 4,
            asset_value: dec!(1000),
            in_stock: true,
        };
        assert_eq!(
            plan_sale(&line, Some(1)),
            Ok(SalePlan::Split {
                remaining: 3,
                remaining_value: dec!(750),
                sold: 1,
                sold_value: dec!(250),
            })
        );
    }

    #[test]
    fn test_sale_rejections() {
        let sold = StockLine {
            quantity: 1,
            asset_value: dec!(10),
            in_stock: false,
        };
        assert_eq!(plan_sale(&sold, None), Err(InventoryError::AlreadySold));

        let line = StockLine {
            in_stock: true,
            ..sold
        };
        assert_eq!(plan_sale(&line, Some(0)), Err(InventoryError::InvalidQuantity));
        assert_eq!(
            plan_sale(&line, Some(2)),
            Err(InventoryError::InsufficientQuantity {
                available: 1,
                requested: 2
            })
        );
        assert_eq!(
            InventoryError::InsufficientQuantity {
                available: 1,
                requested: 2
            }
            .to_string(),
            "Only 1 item(s) available"
        );
    }

    #[test]
    fn test_revenue_draft() {
        let draft = RevenueDraft::for_sale("iPhone 13", dec!(2800), 2, date(), None).unwrap();
        assert_eq!(draft.description, "Sale of 2 iPhone 13");
        assert_eq!(draft.amount, dec!(5600));
        assert_eq!(draft.category, RevenueCategory::Sales);
        assert_eq!(draft.notes, "Revenue from selling iPhone 13");

        let with_notes = RevenueDraft::for_sale("Case", dec!(5), 1, date(), Some("cash")).unwrap();
        assert_eq!(with_notes.notes, "cash");
    }

    #[test]
    fn test_guards() {
        assert!(ensure_expense_deletable(&[]).is_ok());
        assert!(ensure_expense_deletable(&[true, true]).is_ok());
        assert_eq!(
            ensure_expense_deletable(&[true, false, false]),
            Err(InventoryError::SoldProductsExist(2))
        );

        assert!(ensure_product_deletable(true).is_ok());
        assert_eq!(
            ensure_product_deletable(false),
            Err(InventoryError::SoldProductNotDeletable)
        );

        assert!(ensure_product_editable(false, false).is_ok());
        assert_eq!(
            ensure_product_editable(false, true),
            Err(InventoryError::SoldProductFrozen)
        );
    }
}
