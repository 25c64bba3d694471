//! Shared fixtures for repository tests.

#![allow(dead_code)]

use fintools_core::auth::UserRole;
use fintools_db::UserRepository;
use fintools_db::migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

/// A fresh in-memory database with the schema applied.
pub async fn setup() -> DatabaseConnection {
    // One connection, so every query sees the same in-memory database.
    let db = fintools_db::connect_with_pool("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    db
}

/// Registers a user and returns its id.
pub async fn user(db: &DatabaseConnection, role: UserRole) -> Uuid {
    let email = format!("user-{}@example.com", Uuid::new_v4());
    UserRepository::new(db.clone())
        .create("Test User", &email, "$argon2id$test_hash", role)
        .await
        .expect("Failed to create user")
        .id
}
