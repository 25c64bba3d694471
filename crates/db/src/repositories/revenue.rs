//! Revenue repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, QueryOrder, Set,
};
use tracing::info;
use uuid::Uuid;

use fintools_shared::requests::{CreateRevenueRequest, UpdateRevenueRequest};
use fintools_shared::resources::RevenueResource;

use super::views::convert_all;
use crate::entities::revenues;

/// Error types for revenue operations.
#[derive(Debug, thiserror::Error)]
pub enum RevenueError {
    /// Revenue not found.
    #[error("Revenue not found")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Revenue repository.
#[derive(Debug, Clone)]
pub struct RevenueRepository {
    db: DatabaseConnection,
}

impl RevenueRepository {
    /// Creates a new revenue repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists every revenue, newest date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<RevenueResource>, DbErr> {
        let rows = revenues::Entity::find()
            .order_by_desc(revenues::Column::Date)
            .order_by_desc(revenues::Column::CreatedAt)
            .all(&self.db)
            .await?;
        convert_all(rows)
    }

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get(&self, id: Uuid) -> Result<RevenueResource, RevenueError> {
        Ok(self.find(id).await?.try_into()?)
    }

    /// Records revenue received by `received_by`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        received_by: Uuid,
        input: CreateRevenueRequest,
    ) -> Result<RevenueResource, RevenueError> {
        let now = Utc::now();
        let revenue = revenues::ActiveModel {
            id: Set(Uuid::new_v4()),
            description: Set(input.description),
            amount: Set(input.amount),
            category: Set(input.category.as_str().to_string()),
            date: Set(input.date.unwrap_or_else(|| now.date_naive())),
            client: Set(input.client),
            invoice: Set(input.invoice),
            notes: Set(input.notes),
            received_by: Set(received_by),
            verified: Set(false),
            verified_by: Set(None),
            verification_date: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await?;

        info!(revenue_id = %revenue.id, "Revenue recorded");
        Ok(revenue.try_into()?)
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdateRevenueRequest,
    ) -> Result<RevenueResource, RevenueError> {
        let mut active = self.find(id).await?.into_active_model();
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
        if let Some(client) = patch.client {
            active.client = Set(Some(client));
        }
        if let Some(invoice) = patch.invoice {
            active.invoice = Set(Some(invoice));
        }
        if let Some(notes) = patch.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now().into());

        let revenue = active.update(&self.db).await?;
        info!(revenue_id = %id, "Revenue updated");
        Ok(revenue.try_into()?)
    }

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn delete(&self, id: Uuid) -> Result<(), RevenueError> {
        let result = revenues::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(RevenueError::NotFound(id));
        }
        info!(revenue_id = %id, "Revenue deleted");
        Ok(())
    }

    /// Marks a revenue verified by `verifier`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn verify(&self, id: Uuid, verifier: Uuid) -> Result<RevenueResource, RevenueError> {
        let now = Utc::now();
        let mut active = self.find(id).await?.into_active_model();
        active.verified = Set(true);
        active.verified_by = Set(Some(verifier));
        active.verification_date = Set(Some(now.into()));
        active.updated_at = Set(now.into());

        let revenue = active.update(&self.db).await?;
        info!(revenue_id = %id, verifier = %verifier, "Revenue verified");
        Ok(revenue.try_into()?)
    }

    async fn find(&self, id: Uuid) -> Result<revenues::Model, RevenueError> {
        revenues::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(RevenueError::NotFound(id))
    }
}
