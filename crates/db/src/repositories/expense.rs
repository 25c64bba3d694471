//! Expense repository.
//!
//! Besides plain CRUD this owns two stock workflows:
//! - the auto-asset rule, which spawns a product for stock purchases
//! - guarded deletion, which removes unsold products together with the expense

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use fintools_core::inventory::{
    InventoryError, ProductDraft, effective_is_asset, ensure_expense_deletable, spawns_product,
};
use fintools_shared::requests::{CreateExpenseRequest, UpdateExpenseRequest};
use fintools_shared::resources::{ExpenseResource, ProductResource};
use fintools_shared::types::ExpenseCategory;

use super::product::draft_to_active;
use super::views::{convert_all, label};
use crate::entities::{expenses, products};

/// Error types for expense operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    /// Expense not found.
    #[error("Expense not found")]
    NotFound(Uuid),

    /// The expense has no product attached.
    #[error("No product found for this expense")]
    NoProduct(Uuid),

    /// A stock rule refused the operation.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Result of writing an expense.
#[derive(Debug, Clone)]
pub struct ExpenseWrite {
    /// The stored expense, reflecting any product spawned for it.
    pub expense: ExpenseResource,
    /// Product created by the auto-asset rule.
    pub product: Option<ProductResource>,
    /// Failures of the best-effort product step.
    pub warnings: Vec<String>,
}

/// Expense repository.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists every expense, newest date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<ExpenseResource>, DbErr> {
        let rows = expenses::Entity::find()
            .order_by_desc(expenses::Column::Date)
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.db)
            .await?;
        convert_all(rows)
    }

    /// Gets one expense.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get(&self, id: Uuid) -> Result<ExpenseResource, ExpenseError> {
        Ok(self.find(id).await?.try_into()?)
    }

    /// Records an expense and applies the auto-asset rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the expense cannot be stored. A failed product
    /// step is reported in `warnings` instead.
    pub async fn create(
        &self,
        paid_by: Uuid,
        input: CreateExpenseRequest,
    ) -> Result<ExpenseWrite, ExpenseError> {
        let now = Utc::now();
        let is_asset = effective_is_asset(input.category, input.is_asset);

        let expense = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            description: Set(input.description),
            amount: Set(input.amount),
            category: Set(input.category.as_str().to_string()),
            date: Set(input.date.unwrap_or_else(|| now.date_naive())),
            notes: Set(input.notes),
            receipt: Set(input.receipt),
            paid_by: Set(paid_by),
            approved: Set(false),
            approved_by: Set(None),
            approval_date: Set(None),
            is_asset: Set(is_asset),
            is_product_created: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await?;

        info!(expense_id = %expense.id, category = %expense.category, "Expense recorded");

        self.finish_write(expense, input.category, paid_by).await
    }

    /// Applies a partial update.
    ///
    /// When the category or asset flag changes and the expense now qualifies
    /// for the auto-asset rule without having a product, one is spawned.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: UpdateExpenseRequest,
    ) -> Result<ExpenseWrite, ExpenseError> {
        let existing = self.find(id).await?;
        let category_changed = patch
            .category
            .is_some_and(|c| c.as_str() != existing.category);
        let asset_changed = patch.is_asset.is_some_and(|a| a != existing.is_asset);

        let mut active = existing.into_active_model();
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(amount) = patch.amount {
            active.amount = Set(amount);
        }
        if let Some(category) = patch.category {
            active.category = Set(category.as_str().to_string());
        }
        if let Some(date) = patch.date {
            active.date = Set(date);
        }
        if let Some(notes) = patch.notes {
            active.notes = Set(Some(notes));
        }
        if let Some(receipt) = patch.receipt {
            active.receipt = Set(Some(receipt));
        }
        if let Some(is_asset) = patch.is_asset {
            active.is_asset = Set(is_asset);
        }
        active.updated_at = Set(Utc::now().into());
        let expense = active.update(&self.db).await?;

        info!(expense_id = %id, "Expense updated");

        if !(category_changed || asset_changed) {
            return Ok(ExpenseWrite {
                expense: expense.try_into()?,
                product: None,
                warnings: Vec::new(),
            });
        }

        let category: ExpenseCategory = label("expenses.category", &expense.category)?;
        self.finish_write(expense, category, user_id).await
    }

    /// Deletes an expense together with its products.
    ///
    /// Returns the number of products removed. Nothing is deleted when any
    /// linked product has been sold.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and `SoldProductsExist` when a
    /// linked product was sold.
    pub async fn delete(&self, id: Uuid) -> Result<usize, ExpenseError> {
        let txn = self.db.begin().await?;

        expenses::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ExpenseError::NotFound(id))?;

        // Linked products are checked whatever the flag says.
        let linked = products::Entity::find()
            .filter(products::Column::RelatedExpense.eq(id))
            .all(&txn)
            .await?;

        let in_stock: Vec<bool> = linked.iter().map(|p| p.in_stock).collect();
        ensure_expense_deletable(&in_stock)?;

        let mut removed = 0;
        if !linked.is_empty() {
            removed = products::Entity::delete_many()
                .filter(products::Column::RelatedExpense.eq(id))
                .exec(&txn)
                .await?
                .rows_affected;
        }

        expenses::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(expense_id = %id, products_removed = removed, "Expense deleted");
        Ok(usize::try_from(removed).unwrap_or(usize::MAX))
    }

    /// Marks an expense approved by `approver`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn approve(&self, id: Uuid, approver: Uuid) -> Result<ExpenseResource, ExpenseError> {
        let now = Utc::now();
        let mut active = self.find(id).await?.into_active_model();
        active.approved = Set(true);
        active.approved_by = Set(Some(approver));
        active.approval_date = Set(Some(now.into()));
        active.updated_at = Set(now.into());
        let expense = active.update(&self.db).await?;

        info!(expense_id = %id, approver = %approver, "Expense approved");
        Ok(expense.try_into()?)
    }

    /// The product bought with an expense.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown expense and `NoProduct` when the
    /// expense has no product.
    pub async fn product(&self, id: Uuid) -> Result<ProductResource, ExpenseError> {
        let expense = self.find(id).await?;
        if !expense.is_product_created {
            return Err(ExpenseError::NoProduct(id));
        }

        let product = products::Entity::find()
            .filter(products::Column::RelatedExpense.eq(id))
            .order_by_asc(products::Column::CreatedAt)
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::NoProduct(id))?;

        Ok(product.try_into()?)
    }

    async fn find(&self, id: Uuid) -> Result<expenses::Model, ExpenseError> {
        expenses::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::NotFound(id))
    }

    /// Runs the auto-asset rule for a freshly written expense.
    async fn finish_write(
        &self,
        expense: expenses::Model,
        category: ExpenseCategory,
        user_id: Uuid,
    ) -> Result<ExpenseWrite, ExpenseError> {
        if !spawns_product(category, expense.is_asset) || expense.is_product_created {
            return Ok(ExpenseWrite {
                expense: expense.try_into()?,
                product: None,
                warnings: Vec::new(),
            });
        }

        match self.spawn_product(&expense, category, user_id).await {
            Ok((expense, product)) => Ok(ExpenseWrite {
                expense: expense.try_into()?,
                product: Some(product.try_into()?),
                warnings: Vec::new(),
            }),
            Err(e) => {
                warn!(
                    expense_id = %expense.id,
                    error = %e,
                    "Failed to create product from expense"
                );
                Ok(ExpenseWrite {
                    expense: expense.try_into()?,
                    product: None,
                    warnings: vec![format!("Product could not be created for this expense: {e}")],
                })
            }
        }
    }

    async fn spawn_product(
        &self,
        expense: &expenses::Model,
        category: ExpenseCategory,
        user_id: Uuid,
    ) -> Result<(expenses::Model, products::Model), DbErr> {
        let draft = ProductDraft::from_expense(
            &expense.description,
            expense.amount,
            category,
            expense.date,
        );
        let product = draft_to_active(draft, Some(expense.id), user_id)
            .insert(&self.db)
            .await?;

        let mut active = expense.clone().into_active_model();
        active.is_product_created = Set(true);
        active.updated_at = Set(Utc::now().into());
        let expense = active.update(&self.db).await?;

        info!(expense_id = %expense.id, product_id = %product.id, "Product created from expense");
        Ok((expense, product))
    }
}
