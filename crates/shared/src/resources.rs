//! JSON views of stored records, shared by the server and the client.
//!
//! Field names are camelCase on the wire. Money is `Decimal`, serialized as a
//! string and accepted as either a string or a number.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{
    Account, AssetCategory, AssetCondition, ExpenseCategory, ProductCategory, RelatedEntity,
    RevenueCategory, TransactionType,
};

/// A registered user, without credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResource {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role label (`founder`, `admin`, `manager`).
    pub role: String,
    /// Capital contributed by this user.
    pub fund_contribution: Decimal,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// An expense record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResource {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub receipt: Option<String>,
    pub paid_by: Uuid,
    pub approved: bool,
    pub approved_by: Option<Uuid>,
    pub approval_date: Option<DateTime<Utc>>,
    /// Whether the purchase is held as stock.
    pub is_asset: bool,
    /// Whether one or more products reference this expense.
    pub is_product_created: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stock item, in stock or sold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResource {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: ProductCategory,
    pub purchase_price: Decimal,
    pub selling_price: Option<Decimal>,
    pub quantity: i32,
    pub in_stock: bool,
    pub purchase_date: NaiveDate,
    pub sold_date: Option<NaiveDate>,
    pub sold_price: Option<Decimal>,
    pub supplier: Option<String>,
    pub serial_number: Option<String>,
    /// Expense this product was bought with, if any.
    pub related_expense: Option<Uuid>,
    pub is_asset: bool,
    /// `purchase_price × quantity`, pro-rated across sale splits.
    pub asset_value: Decimal,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A revenue record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueResource {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub category: RevenueCategory,
    pub date: NaiveDate,
    pub client: Option<String>,
    pub invoice: Option<String>,
    pub notes: Option<String>,
    pub received_by: Uuid,
    pub verified: bool,
    pub verified_by: Option<Uuid>,
    pub verification_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A long-lived business asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetResource {
    pub id: Uuid,
    pub name: String,
    pub category: AssetCategory,
    pub purchase_value: Decimal,
    pub current_value: Decimal,
    pub acquisition_date: NaiveDate,
    pub description: Option<String>,
    pub condition: AssetCondition,
    pub location: Option<String>,
    /// Yearly depreciation, percent.
    pub depreciation_rate: Decimal,
    pub last_valuation_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cash movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResource {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub category: String,
    pub account: Account,
    pub related_entity: Option<RelatedEntity>,
    pub notes: Option<String>,
    pub reconciled: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A transaction together with the asset it created or updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionWithAsset {
    pub transaction: TransactionResource,
    pub asset: Option<AssetResource>,
}

/// Products touched by a sale plus the revenue it booked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleOutcome {
    /// The original product, followed by the sold split when there is one.
    pub products: Vec<ProductResource>,
    /// Revenue recorded for the sale.
    pub revenue: RevenueResource,
}

/// Dashboard totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_expenses: Decimal,
    pub total_revenue: Decimal,
    /// `total_revenue - total_expenses`.
    pub pure_profit: Decimal,
    /// Sum of asset current values.
    pub total_assets: Decimal,
    /// Sum of founder fund contributions.
    pub founder_contributions: Decimal,
    /// Signed running total per account.
    pub cash_balance: BTreeMap<Account, Decimal>,
}

/// One bucket of the cash-flow series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowPoint {
    /// Bucket label, e.g. `2024-03` for monthly buckets.
    pub period: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub investment: Decimal,
    pub transfer: Decimal,
    /// `income - expense`.
    pub net_cash_flow: Decimal,
}

/// A founder and their contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FounderContribution {
    pub id: Uuid,
    pub name: String,
    pub fund_contribution: Decimal,
}

/// Standard response wrapper.
///
/// `error` is a single message for most failures and a list for validation
/// failures. `warnings` carries failures of best-effort follow-up steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Item count for list payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Product auto-created alongside an expense.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductResource>,
    /// Error message(s).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorMessage>,
    /// Non-fatal follow-up failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// One message or a list of messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    /// Single message.
    One(String),
    /// Validation messages.
    Many(Vec<String>),
}

impl ErrorMessage {
    /// All messages as a flat list.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::One(m) => vec![m.clone()],
            Self::Many(ms) => ms.clone(),
        }
    }
}

impl<T> ApiEnvelope<T> {
    /// A successful response carrying `data`.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: None,
            product: None,
            error: None,
            warnings: Vec::new(),
        }
    }

    /// A failed response.
    #[must_use]
    pub const fn failure(error: ErrorMessage) -> Self {
        Self {
            success: false,
            data: None,
            count: None,
            product: None,
            error: Some(error),
            warnings: Vec::new(),
        }
    }

    /// Attaches warnings.
    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

impl<T> ApiEnvelope<Vec<T>> {
    /// A successful list response with `count` set.
    #[must_use]
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            count: Some(count),
            ..Self::ok(items)
        }
    }
}
