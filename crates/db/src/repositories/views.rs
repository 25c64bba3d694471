//! Conversions from stored rows to their JSON resources.
//!
//! Vocabulary columns hold labels; a label that no longer parses is reported
//! as `DbErr::Type` rather than silently mapped to a default.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use sea_orm::prelude::DateTimeWithTimeZone;

use fintools_shared::resources::{
    AssetResource, ExpenseResource, ProductResource, RevenueResource, TransactionResource,
    UserResource,
};
use fintools_shared::types::RelatedEntity;

use crate::entities::{assets, expenses, products, revenues, transactions, users};

/// Parses a stored label into its vocabulary enum.
pub(crate) fn label<T>(column: &str, value: &str) -> Result<T, DbErr>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| DbErr::Type(format!("{column}: {e}")))
}

fn utc(ts: DateTimeWithTimeZone) -> DateTime<Utc> {
    ts.with_timezone(&Utc)
}

impl From<users::Model> for UserResource {
    fn from(m: users::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            role: m.role,
            fund_contribution: m.fund_contribution,
            created_at: utc(m.created_at),
        }
    }
}

impl TryFrom<expenses::Model> for ExpenseResource {
    type Error = DbErr;

    fn try_from(m: expenses::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: m.id,
            description: m.description,
            amount: m.amount,
            category: label("expenses.category", &m.category)?,
            date: m.date,
            notes: m.notes,
            receipt: m.receipt,
            paid_by: m.paid_by,
            approved: m.approved,
            approved_by: m.approved_by,
            approval_date: m.approval_date.map(utc),
            is_asset: m.is_asset,
            is_product_created: m.is_product_created,
            created_at: utc(m.created_at),
            updated_at: utc(m.updated_at),
        })
    }
}

impl TryFrom<products::Model> for ProductResource {
    type Error = DbErr;

    fn try_from(m: products::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: m.id,
            name: m.name,
            description: m.description,
            category: label("products.category", &m.category)?,
            purchase_price: m.purchase_price,
            selling_price: m.selling_price,
            quantity: m.quantity,
            in_stock: m.in_stock,
            purchase_date: m.purchase_date,
            sold_date: m.sold_date,
            sold_price: m.sold_price,
            supplier: m.supplier,
            serial_number: m.serial_number,
            related_expense: m.related_expense,
            is_asset: m.is_asset,
            asset_value: m.asset_value,
            notes: m.notes,
            created_by: m.created_by,
            created_at: utc(m.created_at),
            updated_at: utc(m.updated_at),
        })
    }
}

impl TryFrom<revenues::Model> for RevenueResource {
    type Error = DbErr;

    fn try_from(m: revenues::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: m.id,
            description: m.description,
            amount: m.amount,
            category: label("revenues.category", &m.category)?,
            date: m.date,
            client: m.client,
            invoice: m.invoice,
            notes: m.notes,
            received_by: m.received_by,
            verified: m.verified,
            verified_by: m.verified_by,
            verification_date: m.verification_date.map(utc),
            created_at: utc(m.created_at),
            updated_at: utc(m.updated_at),
        })
    }
}

impl TryFrom<assets::Model> for AssetResource {
    type Error = DbErr;

    fn try_from(m: assets::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: m.id,
            name: m.name,
            category: label("assets.category", &m.category)?,
            purchase_value: m.purchase_value,
            current_value: m.current_value,
            acquisition_date: m.acquisition_date,
            description: m.description,
            condition: label("assets.condition", &m.condition)?,
            location: m.location,
            depreciation_rate: m.depreciation_rate,
            last_valuation_date: m.last_valuation_date,
            notes: m.notes,
            created_at: utc(m.created_at),
            updated_at: utc(m.updated_at),
        })
    }
}

impl TryFrom<transactions::Model> for TransactionResource {
    type Error = DbErr;

    fn try_from(m: transactions::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: m.id,
            transaction_type: label("transactions.transaction_type", &m.transaction_type)?,
            amount: m.amount,
            description: m.description,
            date: m.date,
            category: m.category,
            account: label("transactions.account", &m.account)?,
            related_entity: RelatedEntity::from_columns(
                m.related_entity_id,
                m.entity_model.as_deref(),
            ),
            notes: m.notes,
            reconciled: m.reconciled,
            created_by: m.created_by,
            created_at: utc(m.created_at),
            updated_at: utc(m.updated_at),
        })
    }
}

/// Converts a list of rows, failing on the first bad label.
pub(crate) fn convert_all<M, R>(models: Vec<M>) -> Result<Vec<R>, DbErr>
where
    R: TryFrom<M, Error = DbErr>,
{
    models.into_iter().map(R::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintools_shared::types::ExpenseCategory;

    #[test]
    fn test_label_parses_known_values() {
        let category: ExpenseCategory = label("expenses.category", "Office Supplies").unwrap();
        assert_eq!(category, ExpenseCategory::OfficeSupplies);
    }

    #[test]
    fn test_unknown_label_is_type_error() {
        let err = label::<ExpenseCategory>("expenses.category", "Groceries").unwrap_err();
        assert!(matches!(err, DbErr::Type(msg) if msg.starts_with("expenses.category")));
    }
}
