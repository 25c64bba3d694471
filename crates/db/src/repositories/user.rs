//! User repository for database operations.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use fintools_core::auth::UserRole;
use fintools_shared::resources::FounderContribution;

use crate::entities::users;

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a new user with no contribution.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<users::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            role: Set(role.as_str().to_string()),
            fund_contribution: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Sets a user's fund contribution. Returns `None` for an unknown user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update_contribution(
        &self,
        id: Uuid,
        amount: Decimal,
    ) -> Result<Option<users::Model>, DbErr> {
        let Some(user) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active = user.into_active_model();
        active.fund_contribution = Set(amount);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&self.db).await.map(Some)
    }

    /// Every founder with their contribution, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn founders(&self) -> Result<Vec<FounderContribution>, DbErr> {
        let founders = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Founder.as_str()))
            .order_by_asc(users::Column::Name)
            .all(&self.db)
            .await?;

        Ok(founders
            .into_iter()
            .map(|u| FounderContribution {
                id: u.id,
                name: u.name,
                fund_contribution: u.fund_contribution,
            })
            .collect())
    }
}
