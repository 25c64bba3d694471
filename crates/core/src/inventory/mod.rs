//! Stock rules linking expenses, products, and sales revenue.
//!
//! Everything here is pure: callers load the records, ask these functions
//! what should happen, then apply the result inside their own database
//! transaction.
//!
//! - `spawns_product` - the auto-asset rule for new expenses
//! - `plan_sale` - full sale versus split of a product
//! - `ensure_*` - deletion and update guards

pub mod error;
pub mod rules;

#[cfg(test)]
mod props;

pub use error::InventoryError;
pub use rules::{
    ProductDraft, RevenueDraft, SalePlan, StockLine, asset_value, effective_is_asset,
    ensure_expense_deletable, ensure_product_deletable, ensure_product_editable, plan_sale,
    spawns_product,
};
