//! Property-based tests for the stock rules.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::{InventoryError, SalePlan, StockLine, asset_value, plan_sale};

/// Strategy for a price between 0.00 and 100,000.00.
fn price() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for an in-stock line whose value matches its price.
fn stock_line() -> impl Strategy<Value = (StockLine, Decimal)> {
    (price(), 1i32..500).prop_map(|(unit, quantity)| {
        (
            StockLine {
                quantity,
                asset_value: asset_value(unit, quantity).unwrap(),
                in_stock: true,
            },
            unit,
        )
    })
}

/// Strategy for a line plus a sell quantity it can satisfy.
fn line_and_request() -> impl Strategy<Value = (StockLine, i32)> {
    stock_line().prop_flat_map(|(line, _)| (Just(line), 1..=line.quantity))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Asset value is always price times quantity.
    #[test]
    fn prop_asset_value_is_price_times_quantity(unit in price(), quantity in 0i32..10_000) {
        prop_assert_eq!(asset_value(unit, quantity), Ok(unit * Decimal::from(quantity)));
    }

    /// A sale never loses or invents units.
    #[test]
    fn prop_sale_conserves_quantity((line, requested) in line_and_request()) {
        match plan_sale(&line, Some(requested)).unwrap() {
            SalePlan::Full { quantity } => {
                prop_assert_eq!(quantity, line.quantity);
                prop_assert_eq!(requested, line.quantity);
            }
            SalePlan::Split { remaining, sold, .. } => {
                prop_assert_eq!(remaining + sold, line.quantity);
                prop_assert!(remaining > 0);
                prop_assert_eq!(sold, requested);
            }
        }
    }

    /// Split values pro-rate by unit value, which equals the purchase price.
    #[test]
    fn prop_split_prorates_by_unit_price((line, unit) in stock_line(), sold in 1i32..500) {
        prop_assume!(sold < line.quantity);

        let SalePlan::Split { remaining, remaining_value, sold_value, .. } =
            plan_sale(&line, Some(sold)).unwrap()
        else {
            return Err(TestCaseError::fail("expected a split"));
        };

        let tolerance = Decimal::new(1, 6);
        prop_assert!((sold_value - unit * Decimal::from(sold)).abs() < tolerance);
        prop_assert!((remaining_value - unit * Decimal::from(remaining)).abs() < tolerance);
        prop_assert!((sold_value + remaining_value - line.asset_value).abs() < tolerance);
    }

    /// Overselling is always rejected with the available count.
    #[test]
    fn prop_oversell_rejected((line, _) in stock_line(), extra in 1i32..100) {
        let requested = line.quantity + extra;
        prop_assert_eq!(
            plan_sale(&line, Some(requested)),
            Err(InventoryError::InsufficientQuantity { available: line.quantity, requested })
        );
    }

    /// Sold lines can never be sold again.
    #[test]
    fn prop_sold_line_rejected((line, _) in stock_line(), requested in proptest::option::of(1i32..10)) {
        let sold = StockLine { in_stock: false, ..line };
        prop_assert_eq!(plan_sale(&sold, requested), Err(InventoryError::AlreadySold));
    }
}
