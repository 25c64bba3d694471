//! Transaction repository.
//!
//! An expense transaction flagged as an asset creates (or refreshes) a linked
//! asset record. The transaction row and the asset row are written inside one
//! database transaction.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use fintools_shared::requests::{AssetDetails, CreateTransactionRequest, UpdateTransactionRequest};
use fintools_shared::resources::{AssetResource, TransactionResource, TransactionWithAsset};
use fintools_shared::types::{AssetCategory, EntityKind, TransactionType};

use super::views::{convert_all, label};
use crate::entities::{assets, transactions};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found.
    #[error("Transaction not found")]
    NotFound(Uuid),

    /// Only the creator may change or remove a transaction.
    #[error("User not authorized")]
    NotCreator,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Transaction repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists every transaction, newest date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<TransactionResource>, DbErr> {
        let rows = transactions::Entity::find()
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await?;
        convert_all(rows)
    }

    /// Gets a transaction with its linked asset.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get(&self, id: Uuid) -> Result<TransactionWithAsset, TransactionError> {
        let row = transactions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(id))?;
        let asset = linked_asset(&self.db, &row).await?;
        Ok(with_asset(row, asset)?)
    }

    /// Records a transaction.
    ///
    /// An expense with `is_asset` and asset details also creates an asset,
    /// which becomes the transaction's related entity.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails; neither row is kept then.
    pub async fn create(
        &self,
        created_by: Uuid,
        input: CreateTransactionRequest,
    ) -> Result<TransactionWithAsset, TransactionError> {
        let now = Utc::now();
        let date = input.date.unwrap_or_else(|| now.date_naive());
        let txn = self.db.begin().await?;

        let mut related = input.related_entity.map(|r| (r.id, r.kind));
        let mut asset = None;
        if input.transaction_type == TransactionType::Expense && input.is_asset == Some(true) {
            if let Some(details) = &input.asset_details {
                let fallback = Fallback {
                    description: Some(&input.description),
                    category: Some(&input.category),
                    amount: Some(input.amount),
                    date: Some(date),
                    notes: input.notes.as_deref(),
                };
                let created = new_asset(details, &fallback, now.date_naive())
                    .insert(&txn)
                    .await?;
                related = Some((created.id, EntityKind::Asset));
                asset = Some(created);
            }
        }

        let row = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            transaction_type: Set(input.transaction_type.as_str().to_string()),
            amount: Set(input.amount),
            description: Set(input.description),
            date: Set(date),
            category: Set(input.category),
            account: Set(input.account.unwrap_or_default().as_str().to_string()),
            related_entity_id: Set(related.map(|(id, _)| id)),
            entity_model: Set(related.map(|(_, kind)| kind.as_str().to_string())),
            notes: Set(input.notes),
            reconciled: Set(input.reconciled.unwrap_or(false)),
            created_by: Set(created_by),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            transaction_id = %row.id,
            asset_id = ?asset.as_ref().map(|a| a.id),
            "Transaction recorded"
        );
        Ok(with_asset(row, asset)?)
    }

    /// Applies a partial update. Only the creator may update.
    ///
    /// For an expense flagged as an asset, the linked asset is refreshed, or
    /// created from the asset details when there is none yet.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and `NotCreator` for anyone but
    /// the creator.
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: UpdateTransactionRequest,
    ) -> Result<TransactionWithAsset, TransactionError> {
        let txn = self.db.begin().await?;

        let existing = transactions::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(TransactionError::NotFound(id))?;
        if existing.created_by != user_id {
            return Err(TransactionError::NotCreator);
        }

        let now = Utc::now();
        let current_type: TransactionType =
            label("transactions.transaction_type", &existing.transaction_type)?;
        let transaction_type = patch.transaction_type.unwrap_or(current_type);
        let linked_id = linked_asset_id(&existing);

        let mut asset = None;
        let mut new_link = None;
        if transaction_type == TransactionType::Expense && patch.is_asset == Some(true) {
            let fallback = Fallback {
                description: patch.description.as_deref(),
                category: patch.category.as_deref(),
                amount: patch.amount,
                date: patch.date,
                notes: patch.notes.as_deref(),
            };
            let details = patch.asset_details.clone().unwrap_or_default();

            let current = match linked_id {
                Some(asset_id) => assets::Entity::find_by_id(asset_id).one(&txn).await?,
                None => None,
            };
            if let Some(current) = current {
                let refreshed = refresh_asset(current, &details, &fallback, now.date_naive());
                asset = Some(refreshed.update(&txn).await?);
            } else if linked_id.is_none() && patch.asset_details.is_some() {
                let fallback_date = patch.date.unwrap_or(existing.date);
                let fallback = Fallback {
                    description: Some(
                        patch.description.as_deref().unwrap_or(&existing.description),
                    ),
                    category: Some(patch.category.as_deref().unwrap_or(&existing.category)),
                    amount: Some(patch.amount.unwrap_or(existing.amount)),
                    date: Some(fallback_date),
                    notes: patch.notes.as_deref().or(existing.notes.as_deref()),
                };
                let created = new_asset(&details, &fallback, now.date_naive())
                    .insert(&txn)
                    .await?;
                new_link = Some(created.id);
                asset = Some(created);
            }
        }

        let mut active = existing.into_active_model();
        active.transaction_type = Set(transaction_type.as_str().to_string());
        if let Some(amount) = patch.amount {
            active.amount = Set(amount);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(category) = patch.category {
            active.category = Set(category);
        }
        if let Some(date) = patch.date {
            active.date = Set(date);
        }
        if let Some(account) = patch.account {
            active.account = Set(account.as_str().to_string());
        }
        if let Some(notes) = patch.notes {
            active.notes = Set(Some(notes));
        }
        if let Some(reconciled) = patch.reconciled {
            active.reconciled = Set(reconciled);
        }
        if let Some(asset_id) = new_link {
            active.related_entity_id = Set(Some(asset_id));
            active.entity_model = Set(Some(EntityKind::Asset.as_str().to_string()));
        }
        active.updated_at = Set(now.into());
        let row = active.update(&txn).await?;

        if asset.is_none() {
            asset = linked_asset(&txn, &row).await?;
        }
        txn.commit().await?;

        info!(transaction_id = %id, "Transaction updated");
        Ok(with_asset(row, asset)?)
    }

    /// Deletes a transaction. A linked asset is kept.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and `NotCreator` for anyone but
    /// the creator.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), TransactionError> {
        let existing = transactions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(id))?;
        if existing.created_by != user_id {
            return Err(TransactionError::NotCreator);
        }

        transactions::Entity::delete_by_id(id).exec(&self.db).await?;
        info!(transaction_id = %id, "Transaction deleted");
        Ok(())
    }
}

// ============================================================================
// Linked assets
// ============================================================================

/// Transaction values an asset falls back to when its details omit a field.
struct Fallback<'a> {
    description: Option<&'a str>,
    category: Option<&'a str>,
    amount: Option<Decimal>,
    date: Option<NaiveDate>,
    notes: Option<&'a str>,
}

impl Fallback<'_> {
    /// Transaction categories that name an asset category map onto it.
    fn category(&self) -> Option<AssetCategory> {
        self.category.and_then(|c| c.parse().ok())
    }
}

fn new_asset(
    details: &AssetDetails,
    fallback: &Fallback<'_>,
    today: NaiveDate,
) -> assets::ActiveModel {
    let now = Utc::now().into();
    let amount = fallback.amount.unwrap_or(Decimal::ZERO);
    assets::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(details
            .name
            .clone()
            .or_else(|| fallback.description.map(str::to_string))
            .unwrap_or_default()),
        category: Set(details
            .category
            .or_else(|| fallback.category())
            .unwrap_or(AssetCategory::Other)
            .as_str()
            .to_string()),
        purchase_value: Set(details.purchase_value.unwrap_or(amount)),
        current_value: Set(details.current_value.unwrap_or(amount)),
        acquisition_date: Set(details
            .acquisition_date
            .or(fallback.date)
            .unwrap_or(today)),
        description: Set(details
            .description
            .clone()
            .or_else(|| fallback.notes.map(str::to_string))),
        condition: Set(details.condition.unwrap_or_default().as_str().to_string()),
        location: Set(None),
        depreciation_rate: Set(details.depreciation_rate.unwrap_or(Decimal::ZERO)),
        last_valuation_date: Set(today),
        notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

fn refresh_asset(
    current: assets::Model,
    details: &AssetDetails,
    fallback: &Fallback<'_>,
    today: NaiveDate,
) -> assets::ActiveModel {
    let category = details
        .category
        .or_else(|| fallback.category())
        .map(|c| c.as_str().to_string());

    let mut active = current.into_active_model();
    if let Some(name) = details.name.as_deref().or(fallback.description) {
        active.name = Set(name.to_string());
    }
    if let Some(category) = category {
        active.category = Set(category);
    }
    if let Some(value) = details.purchase_value.or(fallback.amount) {
        active.purchase_value = Set(value);
    }
    if let Some(value) = details.current_value.or(fallback.amount) {
        active.current_value = Set(value);
    }
    if let Some(date) = details.acquisition_date.or(fallback.date) {
        active.acquisition_date = Set(date);
    }
    if let Some(description) = details.description.as_deref().or(fallback.notes) {
        active.description = Set(Some(description.to_string()));
    }
    if let Some(condition) = details.condition {
        active.condition = Set(condition.as_str().to_string());
    }
    if let Some(rate) = details.depreciation_rate {
        active.depreciation_rate = Set(rate);
    }
    active.last_valuation_date = Set(today);
    active.updated_at = Set(Utc::now().into());
    active
}

fn linked_asset_id(row: &transactions::Model) -> Option<Uuid> {
    match row.entity_model.as_deref() {
        Some(model) if model == EntityKind::Asset.as_str() => row.related_entity_id,
        _ => None,
    }
}

async fn linked_asset<C: ConnectionTrait>(
    db: &C,
    row: &transactions::Model,
) -> Result<Option<assets::Model>, DbErr> {
    match linked_asset_id(row) {
        Some(asset_id) => assets::Entity::find_by_id(asset_id).one(db).await,
        None => Ok(None),
    }
}

fn with_asset(
    row: transactions::Model,
    asset: Option<assets::Model>,
) -> Result<TransactionWithAsset, DbErr> {
    Ok(TransactionWithAsset {
        transaction: row.try_into()?,
        asset: asset.map(AssetResource::try_from).transpose()?,
    })
}
