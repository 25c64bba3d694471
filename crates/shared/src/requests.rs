//! Request payloads with their field-level validation rules.
//!
//! Handlers call `validate()` and turn the failures into
//! `AppError::Validation` via `From<ValidationErrors>`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::types::{
    Account, AssetCategory, AssetCondition, ExpenseCategory, ProductCategory, RelatedEntity,
    RevenueCategory, TransactionType,
};

// ============================================================================
// Field rules
// ============================================================================

/// Largest amount a `decimal(19,4)` column holds.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x89E7_FFFF, 0x8AC7_2304, 0, false, 4);

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("non_negative"));
    }
    Ok(())
}

fn within_limit(value: &Decimal) -> Result<(), ValidationError> {
    if *value > MAX_AMOUNT {
        return Err(ValidationError::new("within_limit"));
    }
    Ok(())
}

fn percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::new("percentage"));
    }
    Ok(())
}

// ============================================================================
// Expenses
// ============================================================================

/// Body of `POST /expenses`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    #[validate(
        custom(function = "not_blank", message = "Please add a description"),
        length(max = 200, message = "Description cannot be more than 200 characters")
    )]
    pub description: String,
    #[validate(
        custom(function = "non_negative", message = "Amount must be a positive number"),
        custom(function = "within_limit", message = "Amount is too large")
    )]
    pub amount: Decimal,
    pub category: ExpenseCategory,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
    #[validate(length(max = 500, message = "Notes cannot be more than 500 characters"))]
    pub notes: Option<String>,
    pub receipt: Option<String>,
    /// Overrides the category-derived default.
    pub is_asset: Option<bool>,
}

/// Body of `PUT /expenses/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseRequest {
    #[validate(
        custom(function = "not_blank", message = "Please add a description"),
        length(max = 200, message = "Description cannot be more than 200 characters")
    )]
    pub description: Option<String>,
    #[validate(
        custom(function = "non_negative", message = "Amount must be a positive number"),
        custom(function = "within_limit", message = "Amount is too large")
    )]
    pub amount: Option<Decimal>,
    pub category: Option<ExpenseCategory>,
    pub date: Option<NaiveDate>,
    #[validate(length(max = 500, message = "Notes cannot be more than 500 characters"))]
    pub notes: Option<String>,
    pub receipt: Option<String>,
    pub is_asset: Option<bool>,
}

// ============================================================================
// Revenues
// ============================================================================

/// Body of `POST /revenues`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRevenueRequest {
    #[validate(
        custom(function = "not_blank", message = "Please add a description"),
        length(max = 200, message = "Description cannot be more than 200 characters")
    )]
    pub description: String,
    #[validate(
        custom(function = "non_negative", message = "Amount must be a positive number"),
        custom(function = "within_limit", message = "Amount is too large")
    )]
    pub amount: Decimal,
    pub category: RevenueCategory,
    pub date: Option<NaiveDate>,
    pub client: Option<String>,
    pub invoice: Option<String>,
    #[validate(length(max = 500, message = "Notes cannot be more than 500 characters"))]
    pub notes: Option<String>,
}

/// Body of `PUT /revenues/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRevenueRequest {
    #[validate(
        custom(function = "not_blank", message = "Please add a description"),
        length(max = 200, message = "Description cannot be more than 200 characters")
    )]
    pub description: Option<String>,
    #[validate(
        custom(function = "non_negative", message = "Amount must be a positive number"),
        custom(function = "within_limit", message = "Amount is too large")
    )]
    pub amount: Option<Decimal>,
    pub category: Option<RevenueCategory>,
    pub date: Option<NaiveDate>,
    pub client: Option<String>,
    pub invoice: Option<String>,
    #[validate(length(max = 500, message = "Notes cannot be more than 500 characters"))]
    pub notes: Option<String>,
}

// ============================================================================
// Assets
// ============================================================================

/// Body of `POST /assets`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssetRequest {
    #[validate(
        custom(function = "not_blank", message = "Please add a name"),
        length(max = 100, message = "Name cannot be more than 100 characters")
    )]
    pub name: String,
    pub category: AssetCategory,
    #[validate(
        custom(function = "non_negative", message = "Purchase value must be a positive number"),
        custom(function = "within_limit", message = "Purchase value is too large")
    )]
    pub purchase_value: Decimal,
    #[validate(
        custom(function = "non_negative", message = "Current value must be a positive number"),
        custom(function = "within_limit", message = "Current value is too large")
    )]
    pub current_value: Decimal,
    pub acquisition_date: NaiveDate,
    #[validate(length(max = 500, message = "Description cannot be more than 500 characters"))]
    pub description: Option<String>,
    pub condition: Option<AssetCondition>,
    #[validate(length(max = 100, message = "Location cannot be more than 100 characters"))]
    pub location: Option<String>,
    #[validate(custom(
        function = "percentage",
        message = "Depreciation rate must be between 0 and 100"
    ))]
    pub depreciation_rate: Option<Decimal>,
    pub last_valuation_date: Option<NaiveDate>,
    #[validate(length(max = 500, message = "Notes cannot be more than 500 characters"))]
    pub notes: Option<String>,
}

/// Body of `PUT /assets/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssetRequest {
    #[validate(
        custom(function = "not_blank", message = "Please add a name"),
        length(max = 100, message = "Name cannot be more than 100 characters")
    )]
    pub name: Option<String>,
    pub category: Option<AssetCategory>,
    #[validate(
        custom(function = "non_negative", message = "Purchase value must be a positive number"),
        custom(function = "within_limit", message = "Purchase value is too large")
    )]
    pub purchase_value: Option<Decimal>,
    #[validate(
        custom(function = "non_negative", message = "Current value must be a positive number"),
        custom(function = "within_limit", message = "Current value is too large")
    )]
    pub current_value: Option<Decimal>,
    pub acquisition_date: Option<NaiveDate>,
    #[validate(length(max = 500, message = "Description cannot be more than 500 characters"))]
    pub description: Option<String>,
    pub condition: Option<AssetCondition>,
    #[validate(length(max = 100, message = "Location cannot be more than 100 characters"))]
    pub location: Option<String>,
    #[validate(custom(
        function = "percentage",
        message = "Depreciation rate must be between 0 and 100"
    ))]
    pub depreciation_rate: Option<Decimal>,
    pub last_valuation_date: Option<NaiveDate>,
    #[validate(length(max = 500, message = "Notes cannot be more than 500 characters"))]
    pub notes: Option<String>,
}

/// Body of `PUT /assets/:id/update-value`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssetValueRequest {
    /// Required; missing is reported as a validation error.
    #[validate(
        required(message = "Current value is required"),
        custom(function = "non_negative", message = "Current value must be a positive number"),
        custom(function = "within_limit", message = "Current value is too large")
    )]
    pub current_value: Option<Decimal>,
    /// Defaults to today.
    pub last_valuation_date: Option<NaiveDate>,
    pub condition: Option<AssetCondition>,
    #[validate(length(max = 500, message = "Notes cannot be more than 500 characters"))]
    pub notes: Option<String>,
}

// ============================================================================
// Products
// ============================================================================

/// Body of `POST /products`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(
        custom(function = "not_blank", message = "Please add a name"),
        length(max = 100, message = "Name cannot be more than 100 characters")
    )]
    pub name: String,
    #[validate(length(max = 200, message = "Description cannot be more than 200 characters"))]
    pub description: Option<String>,
    pub category: ProductCategory,
    #[validate(
        custom(function = "non_negative", message = "Purchase price must be a positive number"),
        custom(function = "within_limit", message = "Purchase price is too large")
    )]
    pub purchase_price: Decimal,
    #[validate(
        custom(function = "non_negative", message = "Selling price must be a positive number"),
        custom(function = "within_limit", message = "Selling price is too large")
    )]
    pub selling_price: Option<Decimal>,
    /// Defaults to 1.
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: Option<i32>,
    pub purchase_date: Option<NaiveDate>,
    pub supplier: Option<String>,
    pub serial_number: Option<String>,
    pub related_expense: Option<Uuid>,
    pub is_asset: Option<bool>,
    #[validate(length(max = 500, message = "Notes cannot be more than 500 characters"))]
    pub notes: Option<String>,
}

/// Body of `PUT /products/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(
        custom(function = "not_blank", message = "Please add a name"),
        length(max = 100, message = "Name cannot be more than 100 characters")
    )]
    pub name: Option<String>,
    #[validate(length(max = 200, message = "Description cannot be more than 200 characters"))]
    pub description: Option<String>,
    pub category: Option<ProductCategory>,
    #[validate(
        custom(function = "non_negative", message = "Purchase price must be a positive number"),
        custom(function = "within_limit", message = "Purchase price is too large")
    )]
    pub purchase_price: Option<Decimal>,
    #[validate(
        custom(function = "non_negative", message = "Selling price must be a positive number"),
        custom(function = "within_limit", message = "Selling price is too large")
    )]
    pub selling_price: Option<Decimal>,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: Option<i32>,
    pub purchase_date: Option<NaiveDate>,
    pub supplier: Option<String>,
    pub serial_number: Option<String>,
    pub is_asset: Option<bool>,
    #[validate(length(max = 500, message = "Notes cannot be more than 500 characters"))]
    pub notes: Option<String>,
}

/// Body of `PUT /products/:id/mark-sold`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MarkSoldRequest {
    #[validate(
        required(message = "Selling price is required"),
        custom(function = "non_negative", message = "Selling price must be a positive number"),
        custom(function = "within_limit", message = "Selling price is too large")
    )]
    pub selling_price: Option<Decimal>,
    #[validate(required(message = "Sold date is required"))]
    pub sold_date: Option<NaiveDate>,
    /// Defaults to the whole quantity.
    #[validate(range(min = 1, message = "Quantity to sell must be at least 1"))]
    pub quantity_to_sell: Option<i32>,
    #[validate(length(max = 500, message = "Notes cannot be more than 500 characters"))]
    pub notes: Option<String>,
}

/// Body of `POST /products/from-expense/:expenseId`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductFromExpenseRequest {
    /// Defaults to the expense description.
    #[validate(
        custom(function = "not_blank", message = "Please add a name"),
        length(max = 100, message = "Name cannot be more than 100 characters")
    )]
    pub name: Option<String>,
    #[validate(length(max = 200, message = "Description cannot be more than 200 characters"))]
    pub description: Option<String>,
    /// Defaults to 1.
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: Option<i32>,
    #[validate(
        custom(function = "non_negative", message = "Selling price must be a positive number"),
        custom(function = "within_limit", message = "Selling price is too large")
    )]
    pub selling_price: Option<Decimal>,
    pub supplier: Option<String>,
    pub serial_number: Option<String>,
    #[validate(length(max = 500, message = "Notes cannot be more than 500 characters"))]
    pub notes: Option<String>,
}

// ============================================================================
// Transactions
// ============================================================================

/// Asset fields attached to an expense transaction.
///
/// Missing fields fall back to the transaction's own values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssetDetails {
    #[validate(
        custom(function = "not_blank", message = "Please add a name"),
        length(max = 100, message = "Name cannot be more than 100 characters")
    )]
    pub name: Option<String>,
    pub category: Option<AssetCategory>,
    #[validate(
        custom(function = "non_negative", message = "Purchase value must be a positive number"),
        custom(function = "within_limit", message = "Purchase value is too large")
    )]
    pub purchase_value: Option<Decimal>,
    #[validate(
        custom(function = "non_negative", message = "Current value must be a positive number"),
        custom(function = "within_limit", message = "Current value is too large")
    )]
    pub current_value: Option<Decimal>,
    pub acquisition_date: Option<NaiveDate>,
    #[validate(length(max = 500, message = "Description cannot be more than 500 characters"))]
    pub description: Option<String>,
    pub condition: Option<AssetCondition>,
    #[validate(custom(
        function = "percentage",
        message = "Depreciation rate must be between 0 and 100"
    ))]
    pub depreciation_rate: Option<Decimal>,
}

/// Body of `POST /transactions`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[validate(
        custom(function = "non_negative", message = "Amount must be a positive number"),
        custom(function = "within_limit", message = "Amount is too large")
    )]
    pub amount: Decimal,
    #[validate(
        custom(function = "not_blank", message = "Please add a description"),
        length(max = 200, message = "Description cannot be more than 200 characters")
    )]
    pub description: String,
    #[validate(length(min = 1, message = "Please add a category"))]
    pub category: String,
    pub date: Option<NaiveDate>,
    pub account: Option<Account>,
    pub related_entity: Option<RelatedEntity>,
    #[validate(length(max = 500, message = "Notes cannot be more than 500 characters"))]
    pub notes: Option<String>,
    pub reconciled: Option<bool>,
    pub is_asset: Option<bool>,
    #[validate(nested)]
    pub asset_details: Option<AssetDetails>,
}

/// Body of `PUT /transactions/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    #[validate(
        custom(function = "non_negative", message = "Amount must be a positive number"),
        custom(function = "within_limit", message = "Amount is too large")
    )]
    pub amount: Option<Decimal>,
    #[validate(
        custom(function = "not_blank", message = "Please add a description"),
        length(max = 200, message = "Description cannot be more than 200 characters")
    )]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Please add a category"))]
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub account: Option<Account>,
    #[validate(length(max = 500, message = "Notes cannot be more than 500 characters"))]
    pub notes: Option<String>,
    pub reconciled: Option<bool>,
    pub is_asset: Option<bool>,
    #[validate(nested)]
    pub asset_details: Option<AssetDetails>,
}

// ============================================================================
// Users
// ============================================================================

/// Body of `PUT /auth/update-contribution/:id`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContributionRequest {
    #[validate(
        custom(function = "non_negative", message = "Fund contribution must be a positive number"),
        custom(function = "within_limit", message = "Fund contribution is too large")
    )]
    pub fund_contribution: Decimal,
}
