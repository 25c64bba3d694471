//! Product repository.
//!
//! Sales run in a single database transaction: the product change (in place
//! or split) and the revenue insert commit together.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use fintools_core::inventory::{
    InventoryError, ProductDraft, RevenueDraft, SalePlan, StockLine, asset_value,
    ensure_product_deletable, ensure_product_editable, plan_sale,
};
use fintools_shared::requests::{
    CreateProductRequest, MarkSoldRequest, ProductFromExpenseRequest, UpdateProductRequest,
};
use fintools_shared::resources::{ProductResource, SaleOutcome};
use fintools_shared::types::ExpenseCategory;

use super::views::{convert_all, label};
use crate::entities::{expenses, products, revenues};

/// Error types for product operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Product not found.
    #[error("Product not found")]
    NotFound(Uuid),

    /// Source expense not found.
    #[error("Expense not found")]
    ExpenseNotFound(Uuid),

    /// The expense already has a product.
    #[error("A product has already been created from this expense")]
    AlreadyCreated(Uuid),

    /// A required sale field is missing.
    #[error("{0}")]
    MissingField(&'static str),

    /// A stock rule refused the operation.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Result of deleting a product.
#[derive(Debug, Clone, Default)]
pub struct ProductRemoval {
    /// Failures of the best-effort expense flag reset.
    pub warnings: Vec<String>,
}

/// Builds the insert for a derived product.
pub(crate) fn draft_to_active(
    draft: ProductDraft,
    related_expense: Option<Uuid>,
    created_by: Uuid,
) -> products::ActiveModel {
    let now = Utc::now().into();
    products::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(draft.name),
        description: Set(Some(draft.description)),
        category: Set(draft.category.as_str().to_string()),
        purchase_price: Set(draft.purchase_price),
        selling_price: Set(None),
        quantity: Set(draft.quantity),
        in_stock: Set(true),
        purchase_date: Set(draft.purchase_date),
        sold_date: Set(None),
        sold_price: Set(None),
        supplier: Set(None),
        serial_number: Set(None),
        related_expense: Set(related_expense),
        is_asset: Set(true),
        asset_value: Set(draft.asset_value),
        notes: Set(None),
        created_by: Set(created_by),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

/// Product repository.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists every product, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<ProductResource>, DbErr> {
        let rows = products::Entity::find()
            .order_by_desc(products::Column::CreatedAt)
            .all(&self.db)
            .await?;
        convert_all(rows)
    }

    /// Gets one product.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get(&self, id: Uuid) -> Result<ProductResource, ProductError> {
        Ok(self.find(id).await?.try_into()?)
    }

    /// Creates a product by hand.
    ///
    /// A product linked to an expense marks that expense as having a product.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseNotFound` when the linked expense does not exist.
    pub async fn create(
        &self,
        created_by: Uuid,
        input: CreateProductRequest,
    ) -> Result<ProductResource, ProductError> {
        let now = Utc::now();
        let quantity = input.quantity.unwrap_or(1);
        let value = asset_value(input.purchase_price, quantity)?;

        let txn = self.db.begin().await?;

        if let Some(expense_id) = input.related_expense {
            let expense = expenses::Entity::find_by_id(expense_id)
                .one(&txn)
                .await?
                .ok_or(ProductError::ExpenseNotFound(expense_id))?;
            if !expense.is_product_created {
                let mut active = expense.into_active_model();
                active.is_product_created = Set(true);
                active.updated_at = Set(now.into());
                active.update(&txn).await?;
            }
        }

        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            description: Set(input.description),
            category: Set(input.category.as_str().to_string()),
            purchase_price: Set(input.purchase_price),
            selling_price: Set(input.selling_price),
            quantity: Set(quantity),
            in_stock: Set(true),
            purchase_date: Set(input.purchase_date.unwrap_or_else(|| now.date_naive())),
            sold_date: Set(None),
            sold_price: Set(None),
            supplier: Set(input.supplier),
            serial_number: Set(input.serial_number),
            related_expense: Set(input.related_expense),
            is_asset: Set(input.is_asset.unwrap_or(true)),
            asset_value: Set(value),
            notes: Set(input.notes),
            created_by: Set(created_by),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            product_id = %product.id,
            related_expense = ?product.related_expense,
            "Product created"
        );
        Ok(product.try_into()?)
    }

    /// Applies a partial update, recomputing the asset value when the price
    /// or quantity changes.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and `SoldProductFrozen` when a
    /// sold product's price or quantity would change.
    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdateProductRequest,
    ) -> Result<ProductResource, ProductError> {
        let existing = self.find(id).await?;
        let touches_stock = patch.purchase_price.is_some() || patch.quantity.is_some();
        ensure_product_editable(existing.in_stock, touches_stock)?;

        let price = patch.purchase_price.unwrap_or(existing.purchase_price);
        let quantity = patch.quantity.unwrap_or(existing.quantity);
        let value = asset_value(price, quantity)?;

        let mut active = existing.into_active_model();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(description) = patch.description {
            active.description = Set(Some(description));
        }
        if let Some(category) = patch.category {
            active.category = Set(category.as_str().to_string());
        }
        if let Some(selling_price) = patch.selling_price {
            active.selling_price = Set(Some(selling_price));
        }
        if let Some(purchase_date) = patch.purchase_date {
            active.purchase_date = Set(purchase_date);
        }
        if let Some(supplier) = patch.supplier {
            active.supplier = Set(Some(supplier));
        }
        if let Some(serial_number) = patch.serial_number {
            active.serial_number = Set(Some(serial_number));
        }
        if let Some(is_asset) = patch.is_asset {
            active.is_asset = Set(is_asset);
        }
        if let Some(notes) = patch.notes {
            active.notes = Set(Some(notes));
        }
        if touches_stock {
            active.purchase_price = Set(price);
            active.quantity = Set(quantity);
            active.asset_value = Set(value);
        }
        active.updated_at = Set(Utc::now().into());

        let product = active.update(&self.db).await?;
        info!(product_id = %id, "Product updated");
        Ok(product.try_into()?)
    }

    /// Deletes an unsold product.
    ///
    /// When this was the last product of its expense, the expense's
    /// `is_product_created` flag is cleared. That reset is best effort.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and `SoldProductNotDeletable`
    /// for sold products.
    pub async fn delete(&self, id: Uuid) -> Result<ProductRemoval, ProductError> {
        let product = self.find(id).await?;
        ensure_product_deletable(product.in_stock)?;

        products::Entity::delete_by_id(id).exec(&self.db).await?;
        info!(product_id = %id, "Product deleted");

        let mut removal = ProductRemoval::default();
        if let Some(expense_id) = product.related_expense {
            if let Err(e) = self.release_expense(expense_id).await {
                warn!(expense_id = %expense_id, error = %e, "Failed to reset expense product flag");
                removal
                    .warnings
                    .push(format!("Related expense could not be updated: {e}"));
            }
        }
        Ok(removal)
    }

    /// Sells some or all units of a product and books the revenue.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown id.
    /// - `MissingField` when the price or date is absent.
    /// - `AlreadySold`, `InvalidQuantity`, `InsufficientQuantity` or
    ///   `AmountOutOfRange` from the stock rules.
    pub async fn mark_sold(
        &self,
        id: Uuid,
        seller: Uuid,
        input: MarkSoldRequest,
    ) -> Result<SaleOutcome, ProductError> {
        let selling_price = input
            .selling_price
            .ok_or(ProductError::MissingField("Selling price is required"))?;
        let sold_date = input
            .sold_date
            .ok_or(ProductError::MissingField("Sold date is required"))?;

        let txn = self.db.begin().await?;

        let product = products::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        let line = StockLine {
            quantity: product.quantity,
            asset_value: product.asset_value,
            in_stock: product.in_stock,
        };
        let plan = plan_sale(&line, input.quantity_to_sell)?;
        let draft = RevenueDraft::for_sale(
            &product.name,
            selling_price,
            plan.quantity_sold(),
            sold_date,
            input.notes.as_deref(),
        )?;
        let now = Utc::now();

        let mut touched = Vec::with_capacity(2);
        match plan {
            SalePlan::Full { .. } => {
                let notes = input.notes.clone().or_else(|| product.notes.clone());
                let mut active = product.clone().into_active_model();
                active.in_stock = Set(false);
                active.sold_date = Set(Some(sold_date));
                active.sold_price = Set(Some(selling_price));
                active.notes = Set(notes);
                active.updated_at = Set(now.into());
                touched.push(active.update(&txn).await?);
            }
            SalePlan::Split {
                remaining,
                remaining_value,
                sold,
                sold_value,
            } => {
                let sold_row = products::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    quantity: Set(sold),
                    in_stock: Set(false),
                    sold_date: Set(Some(sold_date)),
                    sold_price: Set(Some(selling_price)),
                    asset_value: Set(sold_value),
                    notes: Set(input.notes.clone().or_else(|| product.notes.clone())),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                    ..split_copy(&product)
                };

                let mut active = product.clone().into_active_model();
                active.quantity = Set(remaining);
                active.asset_value = Set(remaining_value);
                active.updated_at = Set(now.into());

                touched.push(active.update(&txn).await?);
                touched.push(sold_row.insert(&txn).await?);
            }
        }

        let revenue = revenues::ActiveModel {
            id: Set(Uuid::new_v4()),
            description: Set(draft.description),
            amount: Set(draft.amount),
            category: Set(draft.category.as_str().to_string()),
            date: Set(draft.date),
            client: Set(None),
            invoice: Set(None),
            notes: Set(Some(draft.notes)),
            received_by: Set(seller),
            verified: Set(false),
            verified_by: Set(None),
            verification_date: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            product_id = %id,
            quantity = plan.quantity_sold(),
            revenue_id = %revenue.id,
            "Product sold"
        );

        Ok(SaleOutcome {
            products: convert_all(touched)?,
            revenue: revenue.try_into()?,
        })
    }

    /// Creates a product from an existing expense of any category.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseNotFound` for an unknown expense and `AlreadyCreated`
    /// when a product already references it.
    pub async fn create_from_expense(
        &self,
        expense_id: Uuid,
        created_by: Uuid,
        overrides: ProductFromExpenseRequest,
    ) -> Result<ProductResource, ProductError> {
        let expense = expenses::Entity::find_by_id(expense_id)
            .one(&self.db)
            .await?
            .ok_or(ProductError::ExpenseNotFound(expense_id))?;

        let existing = products::Entity::find()
            .filter(products::Column::RelatedExpense.eq(expense_id))
            .count(&self.db)
            .await?;
        if existing > 0 {
            return Err(ProductError::AlreadyCreated(expense_id));
        }

        let category: ExpenseCategory = label("expenses.category", &expense.category)?;
        let draft = ProductDraft::from_expense_with_quantity(
            &expense.description,
            expense.amount,
            category,
            expense.date,
            overrides.quantity.unwrap_or(1),
        )?;

        let mut active = draft_to_active(draft, Some(expense_id), created_by);
        if let Some(name) = overrides.name {
            active.name = Set(name);
        }
        if let Some(description) = overrides.description {
            active.description = Set(Some(description));
        }
        active.selling_price = Set(overrides.selling_price);
        active.supplier = Set(overrides.supplier);
        active.serial_number = Set(overrides.serial_number);
        active.notes = Set(overrides.notes);

        let txn = self.db.begin().await?;
        let product = active.insert(&txn).await?;

        let mut expense = expense.into_active_model();
        expense.is_product_created = Set(true);
        expense.updated_at = Set(Utc::now().into());
        expense.update(&txn).await?;
        txn.commit().await?;

        info!(expense_id = %expense_id, product_id = %product.id, "Product created from expense");
        Ok(product.try_into()?)
    }

    async fn find(&self, id: Uuid) -> Result<products::Model, ProductError> {
        products::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Clears `is_product_created` once no product references the expense.
    async fn release_expense(&self, expense_id: Uuid) -> Result<(), DbErr> {
        let remaining = products::Entity::find()
            .filter(products::Column::RelatedExpense.eq(expense_id))
            .count(&self.db)
            .await?;
        if remaining > 0 {
            return Ok(());
        }

        let Some(expense) = expenses::Entity::find_by_id(expense_id).one(&self.db).await? else {
            return Ok(());
        };
        let mut active = expense.into_active_model();
        active.is_product_created = Set(false);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await?;
        Ok(())
    }
}

/// The fields a sold split inherits from its source product.
fn split_copy(source: &products::Model) -> products::ActiveModel {
    products::ActiveModel {
        name: Set(source.name.clone()),
        description: Set(source.description.clone()),
        category: Set(source.category.clone()),
        purchase_price: Set(source.purchase_price),
        selling_price: Set(source.selling_price),
        purchase_date: Set(source.purchase_date),
        supplier: Set(source.supplier.clone()),
        serial_number: Set(source.serial_number.clone()),
        related_expense: Set(source.related_expense),
        is_asset: Set(source.is_asset),
        created_by: Set(source.created_by),
        ..Default::default()
    }
}

