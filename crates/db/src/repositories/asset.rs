//! Asset repository.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};
use tracing::info;
use uuid::Uuid;

use fintools_shared::requests::{CreateAssetRequest, UpdateAssetRequest, UpdateAssetValueRequest};
use fintools_shared::resources::AssetResource;
use fintools_shared::types::AssetCategory;

use super::views::convert_all;
use crate::entities::assets;

/// Error types for asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Asset not found.
    #[error("Asset not found")]
    NotFound(Uuid),

    /// New current value missing.
    #[error("Current value is required")]
    MissingValue,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Asset repository.
#[derive(Debug, Clone)]
pub struct AssetRepository {
    db: DatabaseConnection,
}

impl AssetRepository {
    /// Creates a new asset repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists every asset by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<AssetResource>, DbErr> {
        let rows = assets::Entity::find()
            .order_by_asc(assets::Column::Name)
            .all(&self.db)
            .await?;
        convert_all(rows)
    }

    /// Lists the assets of one category by name. A label that is not an
    /// asset category matches nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_category(&self, category: &str) -> Result<Vec<AssetResource>, AssetError> {
        let Ok(category) = category.parse::<AssetCategory>() else {
            return Ok(Vec::new());
        };

        let rows = assets::Entity::find()
            .filter(assets::Column::Category.eq(category.as_str()))
            .order_by_asc(assets::Column::Name)
            .all(&self.db)
            .await?;
        Ok(convert_all(rows)?)
    }

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get(&self, id: Uuid) -> Result<AssetResource, AssetError> {
        Ok(self.find(id).await?.try_into()?)
    }

    /// Registers an asset.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateAssetRequest) -> Result<AssetResource, AssetError> {
        let now = Utc::now();
        let asset = assets::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            category: Set(input.category.as_str().to_string()),
            purchase_value: Set(input.purchase_value),
            current_value: Set(input.current_value),
            acquisition_date: Set(input.acquisition_date),
            description: Set(input.description),
            condition: Set(input.condition.unwrap_or_default().as_str().to_string()),
            location: Set(input.location),
            depreciation_rate: Set(input.depreciation_rate.unwrap_or(Decimal::ZERO)),
            last_valuation_date: Set(input
                .last_valuation_date
                .unwrap_or_else(|| now.date_naive())),
            notes: Set(input.notes),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await?;

        info!(asset_id = %asset.id, "Asset registered");
        Ok(asset.try_into()?)
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdateAssetRequest,
    ) -> Result<AssetResource, AssetError> {
        let mut active = self.find(id).await?.into_active_model();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(category) = patch.category {
            active.category = Set(category.as_str().to_string());
        }
        if let Some(purchase_value) = patch.purchase_value {
            active.purchase_value = Set(purchase_value);
        }
        if let Some(current_value) = patch.current_value {
            active.current_value = Set(current_value);
        }
        if let Some(acquisition_date) = patch.acquisition_date {
            active.acquisition_date = Set(acquisition_date);
        }
        if let Some(description) = patch.description {
            active.description = Set(Some(description));
        }
        if let Some(condition) = patch.condition {
            active.condition = Set(condition.as_str().to_string());
        }
        if let Some(location) = patch.location {
            active.location = Set(Some(location));
        }
        if let Some(rate) = patch.depreciation_rate {
            active.depreciation_rate = Set(rate);
        }
        if let Some(date) = patch.last_valuation_date {
            active.last_valuation_date = Set(date);
        }
        if let Some(notes) = patch.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now().into());

        let asset = active.update(&self.db).await?;
        info!(asset_id = %id, "Asset updated");
        Ok(asset.try_into()?)
    }

    /// Records a new valuation. The valuation date defaults to today.
    ///
    /// # Errors
    ///
    /// Returns `MissingValue` without a current value and `NotFound` for an
    /// unknown id.
    pub async fn update_value(
        &self,
        id: Uuid,
        input: UpdateAssetValueRequest,
    ) -> Result<AssetResource, AssetError> {
        let current_value = input.current_value.ok_or(AssetError::MissingValue)?;
        let now = Utc::now();

        let mut active = self.find(id).await?.into_active_model();
        active.current_value = Set(current_value);
        active.last_valuation_date = Set(input
            .last_valuation_date
            .unwrap_or_else(|| now.date_naive()));
        if let Some(condition) = input.condition {
            active.condition = Set(condition.as_str().to_string());
        }
        if let Some(notes) = input.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(now.into());

        let asset = active.update(&self.db).await?;
        info!(asset_id = %id, current_value = %current_value, "Asset revalued");
        Ok(asset.try_into()?)
    }

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn delete(&self, id: Uuid) -> Result<(), AssetError> {
        let result = assets::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AssetError::NotFound(id));
        }
        info!(asset_id = %id, "Asset deleted");
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<assets::Model, AssetError> {
        assets::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AssetError::NotFound(id))
    }
}

